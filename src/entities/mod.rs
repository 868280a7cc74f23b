//! Entity module - Contains all SeaORM entity definitions for the database.
//! These entities represent the database tables and their relationships.
//! Each entity has a Model struct for data and an Entity struct for operations.

pub mod bank_account;
pub mod bank_transaction;
pub mod building;
pub mod dues_payment;
pub mod dues_schedule;
pub mod expense;
pub mod month;
pub mod resident;
pub mod user;

// Re-export specific types to avoid conflicts
pub use bank_account::{
    Column as BankAccountColumn, Entity as BankAccount, Model as BankAccountModel,
};
pub use bank_transaction::{
    Column as BankTransactionColumn, Entity as BankTransaction, Model as BankTransactionModel,
    MovementType,
};
pub use building::{Column as BuildingColumn, Entity as Building, Model as BuildingModel};
pub use dues_payment::{
    Column as DuesPaymentColumn, Entity as DuesPayment, Model as DuesPaymentModel,
};
pub use dues_schedule::{
    Column as DuesScheduleColumn, Entity as DuesSchedule, Model as DuesScheduleModel,
};
pub use expense::{Column as ExpenseColumn, Entity as Expense, Model as ExpenseModel, PaymentMethod};
pub use month::Month;
pub use resident::{
    Column as ResidentColumn, Entity as Resident, Model as ResidentModel, Ownership,
};
pub use user::{Column as UserColumn, Entity as User, Model as UserModel, Role};

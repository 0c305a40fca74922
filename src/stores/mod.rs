// 各領域的狀態容器，讀取動作更新自身狀態，寫入動作回傳 API 結果

pub mod company;
pub mod contract;
pub mod pro_cash;
pub mod schedule;

pub use company::CompanyStore;
pub use contract::{ContFilter, ContractStore, UnitFilter};
pub use pro_cash::{CashBookEdit, ProCashStore};
pub use schedule::ScheduleStore;

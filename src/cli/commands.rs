pub mod check_vat;
pub mod create_account;
pub mod import_django;
pub mod initdb;

pub use check_vat::check_vat;
pub use create_account::create_account;
pub use import_django::import_django;
pub use initdb::init_database;

pub mod health;
pub mod file_list;
pub mod file_get;
pub mod file_create;
pub mod file_update;
pub mod file_delete;
pub mod diagnostics;

pub use health::*;
pub use file_list::*;
pub use file_get::*;
pub use file_create::*;
pub use file_update::*;
pub use file_delete::*;
pub use diagnostics::*;

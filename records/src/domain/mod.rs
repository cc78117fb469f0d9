mod filters;
mod record;
mod responses;
mod table;
mod user;

pub use filters::*;
pub use record::*;
pub use responses::*;
pub use table::*;
pub use user::*;

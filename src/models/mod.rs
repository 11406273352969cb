//! Data models
//!
//! Request and response shapes used by the API:
//! - Item, Image, Offer
//! - UserIn, UserInDb, UserOut
//! - ModelName enumeration
//! - Tracked wrapper recording which fields a client actually sent

mod item;
mod model_name;
mod tracked;
mod user;

pub use item::{Image, Item, Offer};
pub use model_name::ModelName;
pub use tracked::Tracked;
pub use user::{UserIn, UserInDb, UserOut};

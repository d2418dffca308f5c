pub mod internal_messages;
pub mod menu_messages;
pub mod restaurant_messages;
pub mod review_messages;

pub use menu_messages::*;
pub use restaurant_messages::*;
pub use review_messages::*;

pub mod municipality;
pub mod organization;
pub mod region;
pub mod system_setting;

pub use municipality::*;
pub use organization::*;
pub use region::*;
pub use system_setting::*;

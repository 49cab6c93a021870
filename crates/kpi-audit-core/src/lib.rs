pub mod error;
pub mod impact;
pub mod model;
pub mod pipeline;
pub mod recommend;
pub mod rules;
pub mod summary;
pub mod table;
pub mod value;
pub mod vanity;

pub use error::*;
pub use impact::*;
pub use model::*;
pub use pipeline::*;
pub use recommend::*;
pub use rules::*;
pub use summary::*;
pub use table::*;
pub use value::*;
pub use vanity::*;

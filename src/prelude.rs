pub use crate::error::{BuildError, Error, HeaderError, ReadError, Result};
pub use crate::graph::{GraphBuilder, GraphReader};
pub use crate::store::StoreReader;
pub use crate::vertex::Vertex;

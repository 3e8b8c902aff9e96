pub mod registry;
pub mod resolver;

pub use registry::{PeerRegistry, normalize_address};
pub use resolver::{ChainSource, HttpChainSource, RemoteChain, longest_valid_chain};

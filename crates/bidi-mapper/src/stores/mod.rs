//! The mapper's process-wide singleton stores (spec §3, §9 "Cyclic
//! references"). Entities reference each other by identity string only;
//! lookups go through these stores.

pub mod context;
pub mod intercept;
pub mod network;
pub mod preload_script;
pub mod realm;
pub mod user_context;

pub use context::BrowsingContextStore;
pub use intercept::InterceptStore;
pub use network::NetworkStore;
pub use preload_script::PreloadScriptStore;
pub use realm::RealmStore;
pub use user_context::UserContextStore;

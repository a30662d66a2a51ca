//! Noodlebar server: in-memory repositories, the menu and order services, and
//! the Tower pipeline that routes request messages to them.

pub mod app;
pub mod logging;
pub mod service;
pub mod storage;

pub use app::{HandleError, NoodlebarApp};
pub use logging::{init_logging, LogFormat};
pub use service::{MenuService, OrderService, ServerConfig};
pub use storage::{MenuItem, Order, OrderStatus, Repositories, Repository, RepositoryError};

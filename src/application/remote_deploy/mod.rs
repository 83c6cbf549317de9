//! Remote Deploy Module
//!
//! Gates a service deployment on its upstream stacks.
//!
//! ## Structure
//!
//! - `options` - Request types (`RemoteDeployRequest`, `EnvInjection`)
//! - `result` - Report and error types (`RemoteDeployReport`, `RemoteDeployError`)
//! - `use_case` - Core orchestration (`RemoteDeployUseCase`)
//!
//! ## Usage
//!
//! ```ignore
//! use stackgate::application::remote_deploy::{RemoteDeployRequest, RemoteDeployUseCase};
//!
//! let use_case = RemoteDeployUseCase::new(connector, deployer, events);
//! let report = use_case.execute(&RemoteDeployRequest::new("api", "services/api", "prod", "prod"))?;
//! ```

mod options;
mod result;
mod use_case;

pub use options::{EnvInjection, RemoteDeployRequest};
pub use result::{MissingVariable, RemoteDeployError, RemoteDeployReport};
pub use use_case::RemoteDeployUseCase;

//! Wire data model for the SNMP Studio backend.
//!
//! Every type here mirrors a JSON body exchanged with the backend's `/api`
//! surface. The console crate consumes these through its `ApiService` port;
//! nothing in this crate performs I/O.
#![allow(missing_docs)]

pub mod error;
pub mod mibs;
pub mod settings;
pub mod simulator;
pub mod system;
pub mod traps;
pub mod walk;

pub use error::{ModelError, Result as ModelResult};
pub use mibs::{
    MibFileList, MibInfo, MibReload, MibStatus, TrapDefinition, TrapList,
    validate_mib_file_name,
};
pub use settings::AuthUpdate;
pub use simulator::{CustomData, SimulatorConfig, SimulatorStatus};
pub use system::{ActionResponse, ApiErrorBody, AuthCheck, Meta};
pub use traps::{ReceivedTrap, ReceivedTraps, TrapReceiverConfig, TrapReceiverStatus};
pub use walk::{WalkMode, WalkRequest, WalkResponse};

//! Device registration and driver module lifecycle.
//!
//! Drivers do not publish themselves. A [`DriverModule`] describes the node
//! it wants and hands over its [`CharDevice`]; the [`DeviceManager`]
//! allocates a device number, records the node's permissions and runs the
//! module's init and exit hooks.

use kernel_api::CharDevice;
use serde::{Deserialize, Serialize};
use services_logger::{LogEntry, LogLevel, Logger};
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;
use thiserror::Error;

/// Lowest major number handed out dynamically
pub const DYNAMIC_MAJOR_MIN: u32 = 234;
/// Highest major number handed out dynamically; allocation starts here
pub const DYNAMIC_MAJOR_MAX: u32 = 254;

/// Major/minor device number pair
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DevNumber {
    pub major: u32,
    pub minor: u32,
}

impl fmt::Display for DevNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.major, self.minor)
    }
}

/// Permission bits of a device node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileMode(u16);

impl FileMode {
    /// Readable and writable by everyone
    pub const WORLD_READ_WRITE: FileMode = FileMode(0o666);

    pub const fn from_bits(bits: u16) -> Self {
        Self(bits & 0o7777)
    }

    pub const fn bits(&self) -> u16 {
        self.0
    }
}

impl fmt::Display for FileMode {
    /// Octal with a leading zero, e.g. `0666`
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0 == 0 {
            f.write_str("0")
        } else {
            write!(f, "0{:o}", self.0)
        }
    }
}

/// How a device wants to be published
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceDescriptor {
    /// Name of the node under `/dev`
    pub node_name: String,
    /// Name of the reserved number region, used in log lines
    pub region_name: String,
    /// Device class the node is created under
    pub class_name: String,
    /// Node permissions
    pub mode: FileMode,
}

impl DeviceDescriptor {
    pub fn new(
        node_name: impl Into<String>,
        region_name: impl Into<String>,
        class_name: impl Into<String>,
    ) -> Self {
        Self {
            node_name: node_name.into(),
            region_name: region_name.into(),
            class_name: class_name.into(),
            mode: FileMode::WORLD_READ_WRITE,
        }
    }

    pub fn with_mode(mut self, mode: FileMode) -> Self {
        self.mode = mode;
        self
    }

    /// Path the node appears at
    pub fn node_path(&self) -> String {
        format!("/dev/{}", self.node_name)
    }

    /// Variables attached to the device's uevent
    pub fn uevent_vars(&self) -> Vec<String> {
        vec![format!("DEVMODE={}", self.mode)]
    }
}

/// A loadable driver
pub trait DriverModule: Send + Sync {
    /// Node the driver wants
    fn descriptor(&self) -> DeviceDescriptor;

    /// Device instance backing the node
    fn device(&self) -> Arc<dyn CharDevice>;

    /// Called after the node is registered
    fn module_init(&self) {}

    /// Called before the node is removed
    fn module_exit(&self) {}
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum DeviceManagerError {
    #[error("Device name already registered: {0}")]
    NameInUse(String),

    #[error("Device not found: {0}")]
    DeviceNotFound(String),

    #[error("No free major numbers")]
    NumbersExhausted,
}

/// A registered node
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Registration {
    pub descriptor: DeviceDescriptor,
    pub number: DevNumber,
}

struct LoadedModule {
    module: Arc<dyn DriverModule>,
    registration: Registration,
}

/// Device manager that publishes driver modules as device nodes.
pub struct DeviceManager {
    logger: Logger,
    modules: BTreeMap<String, LoadedModule>,
}

impl DeviceManager {
    pub fn new(logger: Logger) -> Self {
        Self {
            logger,
            modules: BTreeMap::new(),
        }
    }

    /// Registers a module's node and runs its init hook
    pub fn load(&mut self, module: Arc<dyn DriverModule>) -> Result<DevNumber, DeviceManagerError> {
        let descriptor = module.descriptor();
        if self.modules.contains_key(&descriptor.node_name) {
            return Err(DeviceManagerError::NameInUse(descriptor.node_name));
        }

        let number = DevNumber {
            major: self.allocate_major()?,
            minor: 0,
        };

        self.logger.log(
            LogEntry::new(
                LogLevel::Info,
                format!("{} registered with major {}", descriptor.region_name, number.major),
            )
            .with_source(module.device().id())
            .with_field("class", &descriptor.class_name)
            .with_field("mode", descriptor.mode),
        );
        self.logger.log(
            LogEntry::new(
                LogLevel::Info,
                format!(
                    "{} do: `mknod {} c {} {}' to create the device file",
                    descriptor.region_name,
                    descriptor.node_path(),
                    number.major,
                    number.minor
                ),
            )
            .with_field("major", number.major)
            .with_field("minor", number.minor),
        );

        let node_name = descriptor.node_name.clone();
        self.modules.insert(
            node_name,
            LoadedModule {
                module: Arc::clone(&module),
                registration: Registration { descriptor, number },
            },
        );
        module.module_init();
        Ok(number)
    }

    /// Runs a module's exit hook and removes its node
    pub fn unload(&mut self, node_name: &str) -> Result<(), DeviceManagerError> {
        let loaded = self
            .modules
            .remove(node_name)
            .ok_or_else(|| DeviceManagerError::DeviceNotFound(node_name.to_string()))?;
        loaded.module.module_exit();
        self.logger.info(format!(
            "{} unregistered from {}",
            loaded.registration.descriptor.region_name, loaded.registration.number
        ));
        Ok(())
    }

    /// Looks up the device behind a node
    pub fn device(&self, node_name: &str) -> Result<Arc<dyn CharDevice>, DeviceManagerError> {
        self.modules
            .get(node_name)
            .map(|loaded| loaded.module.device())
            .ok_or_else(|| DeviceManagerError::DeviceNotFound(node_name.to_string()))
    }

    pub fn registration(&self, node_name: &str) -> Option<&Registration> {
        self.modules.get(node_name).map(|loaded| &loaded.registration)
    }

    /// All registered nodes, ordered by name
    pub fn registrations(&self) -> Vec<&Registration> {
        self.modules.values().map(|loaded| &loaded.registration).collect()
    }

    fn allocate_major(&self) -> Result<u32, DeviceManagerError> {
        (DYNAMIC_MAJOR_MIN..=DYNAMIC_MAJOR_MAX)
            .rev()
            .find(|major| {
                !self
                    .modules
                    .values()
                    .any(|loaded| loaded.registration.number.major == *major)
            })
            .ok_or(DeviceManagerError::NumbersExhausted)
    }
}

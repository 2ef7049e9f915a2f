//! Device integrity assessment.
//!
//! A simple boolean gate evaluated fresh before every secure operation;
//! root state can change at runtime, so nothing is cached.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Host-provided facts about the device the gate runs on.
pub trait DeviceEnvironment: Send + Sync {
    /// Whether the device is rooted. Implementations are expected to ignore
    /// BusyBox-only root indicators.
    fn is_rooted(&self) -> bool;

    /// Whether this is a debug build of the host app.
    fn is_debuggable(&self) -> bool;

    /// Whether an accepted test-automation flag is active.
    fn is_test_automation(&self) -> bool;

    /// Whether a device credential (PIN, pattern, biometric) is configured.
    fn is_device_secure(&self) -> bool;
}

/// Whether secure storage may be used on this device.
///
/// A rooted device is rejected unless this is a debug build or a recognized
/// test-automation run.
pub fn integrity_assessment(env: &dyn DeviceEnvironment) -> bool {
    !env.is_rooted() || env.is_debuggable() || env.is_test_automation()
}

/// Environment for desktop/dev hosts without a root-detection facility.
#[derive(Debug, Default, Clone, Copy)]
pub struct HostEnvironment;

impl DeviceEnvironment for HostEnvironment {
    fn is_rooted(&self) -> bool {
        false
    }

    fn is_debuggable(&self) -> bool {
        cfg!(debug_assertions)
    }

    fn is_test_automation(&self) -> bool {
        false
    }

    fn is_device_secure(&self) -> bool {
        false
    }
}

/// Mutable fake environment for tests.
///
/// Flags are atomics so a test can flip root state mid-run, mirroring
/// external root toggles on real devices.
#[derive(Debug, Default)]
pub struct FakeDevice {
    rooted: AtomicBool,
    debuggable: AtomicBool,
    test_automation: AtomicBool,
    device_secure: AtomicBool,
}

impl FakeDevice {
    /// A trusted device: not rooted, release build, credential configured.
    pub fn trusted() -> Arc<Self> {
        let device = Self::default();
        device.device_secure.store(true, Ordering::SeqCst);
        Arc::new(device)
    }

    /// A rooted device in a release build, which fails the assessment.
    pub fn rooted() -> Arc<Self> {
        let device = Self::default();
        device.rooted.store(true, Ordering::SeqCst);
        Arc::new(device)
    }

    pub fn set_rooted(&self, value: bool) {
        self.rooted.store(value, Ordering::SeqCst);
    }

    pub fn set_debuggable(&self, value: bool) {
        self.debuggable.store(value, Ordering::SeqCst);
    }

    pub fn set_test_automation(&self, value: bool) {
        self.test_automation.store(value, Ordering::SeqCst);
    }

    pub fn set_device_secure(&self, value: bool) {
        self.device_secure.store(value, Ordering::SeqCst);
    }
}

impl DeviceEnvironment for FakeDevice {
    fn is_rooted(&self) -> bool {
        self.rooted.load(Ordering::SeqCst)
    }

    fn is_debuggable(&self) -> bool {
        self.debuggable.load(Ordering::SeqCst)
    }

    fn is_test_automation(&self) -> bool {
        self.test_automation.load(Ordering::SeqCst)
    }

    fn is_device_secure(&self) -> bool {
        self.device_secure.load(Ordering::SeqCst)
    }
}

//! Host-facing autopilot provider API
//!
//! Every call names the device it is meant for; calls for any device other
//! than the bound autopilot fail with `DeviceMismatch` instead of reaching the
//! bus.

use crate::dispatcher::{AutopilotEngine, AutopilotStatus, FrameSink, TurnDirection};
use crate::types::{AutopilotError, AutopilotState, Result, Target};

/// Operations the host application invokes on an autopilot provider
pub trait AutopilotProvider {
    fn get_data(&self, device_id: &str) -> Result<AutopilotStatus>;

    fn get_state(&self, device_id: &str) -> Result<Option<AutopilotState>>;
    fn set_state(&mut self, state: &str, device_id: &str) -> Result<bool>;

    fn get_mode(&self, device_id: &str) -> Result<Option<String>>;
    fn set_mode(&mut self, mode: &str, device_id: &str) -> Result<()>;

    fn get_target(&self, device_id: &str) -> Result<Option<Target>>;
    fn set_target(&mut self, value: f64, device_id: &str) -> Result<()>;
    fn adjust_target(&mut self, value: f64, device_id: &str) -> Result<()>;

    fn engage(&mut self, device_id: &str) -> Result<bool>;
    fn disengage(&mut self, device_id: &str) -> Result<bool>;

    fn tack(&mut self, direction: TurnDirection, device_id: &str) -> Result<()>;
    fn gybe(&mut self, direction: TurnDirection, device_id: &str) -> Result<()>;
    fn dodge(&mut self, direction: TurnDirection, device_id: &str) -> Result<()>;
}

impl<S: FrameSink> AutopilotEngine<S> {
    fn ensure_device(&self, device_id: &str) -> Result<()> {
        if device_id == self.device_id() {
            Ok(())
        } else {
            Err(AutopilotError::DeviceMismatch {
                requested: device_id.to_string(),
                bound: self.device_id().to_string(),
            })
        }
    }
}

impl<S: FrameSink> AutopilotProvider for AutopilotEngine<S> {
    fn get_data(&self, device_id: &str) -> Result<AutopilotStatus> {
        self.ensure_device(device_id)?;
        Ok(self.status())
    }

    fn get_state(&self, device_id: &str) -> Result<Option<AutopilotState>> {
        self.ensure_device(device_id)?;
        Ok(self.snapshot().state)
    }

    fn set_state(&mut self, state: &str, device_id: &str) -> Result<bool> {
        self.ensure_device(device_id)?;
        AutopilotEngine::set_state(self, state)
    }

    fn get_mode(&self, device_id: &str) -> Result<Option<String>> {
        self.ensure_device(device_id)?;
        Ok(self.mode().map(str::to_string))
    }

    fn set_mode(&mut self, mode: &str, device_id: &str) -> Result<()> {
        self.ensure_device(device_id)?;
        AutopilotEngine::set_mode(self, mode)
    }

    fn get_target(&self, device_id: &str) -> Result<Option<Target>> {
        self.ensure_device(device_id)?;
        Ok(self.target())
    }

    fn set_target(&mut self, value: f64, device_id: &str) -> Result<()> {
        self.ensure_device(device_id)?;
        AutopilotEngine::set_target(self, value)
    }

    fn adjust_target(&mut self, value: f64, device_id: &str) -> Result<()> {
        self.ensure_device(device_id)?;
        AutopilotEngine::adjust_target(self, value)
    }

    fn engage(&mut self, device_id: &str) -> Result<bool> {
        self.ensure_device(device_id)?;
        AutopilotEngine::engage(self)
    }

    fn disengage(&mut self, device_id: &str) -> Result<bool> {
        self.ensure_device(device_id)?;
        AutopilotEngine::disengage(self)
    }

    fn tack(&mut self, direction: TurnDirection, device_id: &str) -> Result<()> {
        self.ensure_device(device_id)?;
        AutopilotEngine::tack(self, direction)
    }

    fn gybe(&mut self, direction: TurnDirection, device_id: &str) -> Result<()> {
        self.ensure_device(device_id)?;
        AutopilotEngine::gybe(self, direction)
    }

    fn dodge(&mut self, direction: TurnDirection, device_id: &str) -> Result<()> {
        self.ensure_device(device_id)?;
        AutopilotEngine::dodge(self, direction)
    }
}

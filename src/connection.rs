use crate::client::{adb::AdbClient, DeviceBridge};
use crate::config::BridgeConfig;
use crate::error::{Error, Result};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::info;

pub type SharedBridge = Arc<Mutex<Box<dyn DeviceBridge>>>;

pub struct ConnectionManager {
    config: BridgeConfig,
    client: Option<SharedBridge>,
}

impl ConnectionManager {
    pub fn new(config: BridgeConfig) -> Self {
        Self {
            config,
            client: None,
        }
    }

    pub async fn connect(&mut self) -> Result<SharedBridge> {
        if let Some(client) = &self.client {
            return Ok(client.clone());
        }

        let adb = AdbClient::new(self.config.program.clone(), self.config.serial.clone());
        let client = Self::verify(Box::new(adb)).await?;
        self.client = Some(client.clone());
        Ok(client)
    }

    /// Checks the bridge runs and a device is ready, then wraps it for sharing.
    pub async fn verify(mut client: Box<dyn DeviceBridge>) -> Result<SharedBridge> {
        client.check_available().await?;

        // get-state exits non-zero when nothing is attached
        let state = match client.device_state().await {
            Ok(state) => state,
            Err(Error::Command { stderr, .. }) => {
                return Err(Error::NoDevice { state: stderr });
            }
            Err(e) => return Err(e),
        };
        if state != "device" {
            return Err(Error::NoDevice { state });
        }

        info!("device ready");
        Ok(Arc::new(Mutex::new(client)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::PullOutcome;
    use async_trait::async_trait;
    use mockall::mock;
    use std::path::Path;

    mock! {
        TestBridge {}

        #[async_trait]
        impl DeviceBridge for TestBridge {
            async fn check_available(&mut self) -> Result<()>;
            async fn device_state(&mut self) -> Result<String>;
            async fn list_dir(&mut self, path: &str) -> Result<Vec<String>>;
            async fn pull(&mut self, remote_path: &str, local_dir: &Path) -> Result<PullOutcome>;
            async fn remove(&mut self, remote_path: &str) -> Result<()>;
            async fn set_prop(&mut self, key: &str, value: &str) -> Result<String>;
        }
    }

    #[test]
    fn test_connection_manager_creation() {
        let manager = ConnectionManager::new(BridgeConfig::default());
        assert_eq!(manager.config.program, "adb");
        assert!(manager.client.is_none());
    }

    #[tokio::test]
    async fn test_verify_ready_device() {
        let mut mock = MockTestBridge::new();
        mock.expect_check_available().times(1).returning(|| Ok(()));
        mock.expect_device_state()
            .times(1)
            .returning(|| Ok("device".to_string()));

        assert!(ConnectionManager::verify(Box::new(mock)).await.is_ok());
    }

    #[tokio::test]
    async fn test_verify_unauthorized_device() {
        let mut mock = MockTestBridge::new();
        mock.expect_check_available().returning(|| Ok(()));
        mock.expect_device_state()
            .returning(|| Ok("unauthorized".to_string()));

        match ConnectionManager::verify(Box::new(mock)).await {
            Err(Error::NoDevice { state }) => assert_eq!(state, "unauthorized"),
            Err(e) => panic!("unexpected error {:?}", e),
            Ok(_) => panic!("expected NoDevice"),
        }
    }

    #[tokio::test]
    async fn test_verify_no_device_attached() {
        let mut mock = MockTestBridge::new();
        mock.expect_check_available().returning(|| Ok(()));
        mock.expect_device_state().returning(|| {
            Err(Error::Command {
                command: "adb get-state".to_string(),
                stderr: "error: no devices/emulators found".to_string(),
            })
        });

        match ConnectionManager::verify(Box::new(mock)).await {
            Err(Error::NoDevice { state }) => assert!(state.contains("no devices")),
            Err(e) => panic!("unexpected error {:?}", e),
            Ok(_) => panic!("expected NoDevice"),
        }
    }

    #[tokio::test]
    async fn test_verify_bridge_missing_skips_state() {
        let mut mock = MockTestBridge::new();
        mock.expect_check_available().returning(|| {
            Err(Error::BridgeUnavailable {
                program: "adb".to_string(),
                source: std::io::Error::from(std::io::ErrorKind::NotFound),
            })
        });
        mock.expect_device_state().never();

        assert!(matches!(
            ConnectionManager::verify(Box::new(mock)).await,
            Err(Error::BridgeUnavailable { .. })
        ));
    }
}

use busbar_sf_soap::{Result, SoapTransport, Value};
use tracing::{debug, instrument};

use super::params;
use crate::deploy::{DeployArchive, DeployOptions};

impl<T: SoapTransport> super::MetadataClient<T> {
    /// Deploy a zip archive of metadata.
    ///
    /// The archive is either raw bytes or a path to an existing file, which
    /// is read before the call. Returns the async result naming the deploy
    /// id; poll it with [`check_deploy_status`](Self::check_deploy_status).
    #[instrument(skip(self, archive, options))]
    pub async fn deploy(
        &mut self,
        archive: impl Into<DeployArchive>,
        options: &DeployOptions,
    ) -> Result<Value> {
        let zip_file = archive.into().into_bytes().await?;
        debug!(archive_bytes = zip_file.len(), "Deploying archive");

        self.call(
            "deploy",
            params([
                ("ZipFile", Value::Bytes(zip_file)),
                ("DeployOptions", options.to_value()),
            ]),
        )
        .await
    }

    /// Check the status of a deploy operation.
    #[instrument(skip(self))]
    pub async fn check_deploy_status(
        &mut self,
        async_process_id: &str,
        include_details: bool,
    ) -> Result<Value> {
        self.call(
            "checkDeployStatus",
            params([
                ("asyncProcessId", Value::from(async_process_id)),
                ("includeDetails", Value::from(include_details)),
            ]),
        )
        .await
    }

    /// Cancel an in-progress deployment.
    ///
    /// Canceling is asynchronous; poll
    /// [`check_deploy_status`](Self::check_deploy_status) until the deploy
    /// reaches `Canceled`.
    #[instrument(skip(self))]
    pub async fn cancel_deploy(&mut self, async_process_id: &str) -> Result<Value> {
        self.call("cancelDeploy", params([("String", Value::from(async_process_id))]))
            .await
    }

    /// Deploy a recently validated package without re-running tests.
    #[instrument(skip(self))]
    pub async fn deploy_recent_validation(&mut self, validation_id: &str) -> Result<Value> {
        self.call(
            "deployRecentValidation",
            params([("validationId", Value::from(validation_id))]),
        )
        .await
    }
}

//! Deploy inputs.

use std::path::{Path, PathBuf};

use busbar_sf_soap::{Error, ErrorKind, Fields, Result, Value};

/// Test level for deployments.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TestLevel {
    /// No tests run.
    NoTestRun,
    /// Run local tests only.
    #[default]
    RunLocalTests,
    /// Run all tests in org.
    RunAllTestsInOrg,
    /// Run specified tests.
    RunSpecifiedTests,
}

impl std::fmt::Display for TestLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TestLevel::NoTestRun => write!(f, "NoTestRun"),
            TestLevel::RunLocalTests => write!(f, "RunLocalTests"),
            TestLevel::RunAllTestsInOrg => write!(f, "RunAllTestsInOrg"),
            TestLevel::RunSpecifiedTests => write!(f, "RunSpecifiedTests"),
        }
    }
}

/// Options for deployment.
#[derive(Debug, Clone)]
pub struct DeployOptions {
    /// Allow references to missing files in the zip.
    pub allow_missing_files: bool,
    /// Automatically update the package manifest.
    pub auto_update_package: bool,
    /// Validate only, don't actually deploy.
    pub check_only: bool,
    /// Ignore warnings during deployment.
    pub ignore_warnings: bool,
    /// Retrieve metadata after deploy.
    pub perform_retrieve: bool,
    /// Hard delete components (only in sandbox/DE orgs).
    pub purge_on_delete: bool,
    /// Rollback all changes if any component fails.
    pub rollback_on_error: bool,
    /// Run all Apex tests.
    pub run_all_tests: bool,
    /// Deploy as a single package.
    pub single_package: bool,
    /// Test level for deployment.
    pub test_level: Option<TestLevel>,
    /// Specific tests to run (when test_level is RunSpecifiedTests).
    pub run_tests: Vec<String>,
}

impl Default for DeployOptions {
    fn default() -> Self {
        Self {
            allow_missing_files: false,
            auto_update_package: false,
            check_only: false,
            ignore_warnings: true,
            perform_retrieve: false,
            purge_on_delete: false,
            rollback_on_error: true,
            run_all_tests: false,
            single_package: true,
            test_level: None,
            run_tests: vec![],
        }
    }
}

impl DeployOptions {
    /// Validate without committing.
    pub fn check_only(mut self) -> Self {
        self.check_only = true;
        self
    }

    pub fn with_test_level(mut self, test_level: TestLevel) -> Self {
        self.test_level = Some(test_level);
        self
    }

    /// Run the named test classes. Implies [`TestLevel::RunSpecifiedTests`].
    pub fn with_run_tests(mut self, tests: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.run_tests = tests.into_iter().map(Into::into).collect();
        self.test_level = Some(TestLevel::RunSpecifiedTests);
        self
    }

    /// `DeployOptions` element in schema order.
    pub(crate) fn to_value(&self) -> Value {
        let run_tests = if self.test_level == Some(TestLevel::RunSpecifiedTests) {
            Value::from(self.run_tests.clone())
        } else {
            Value::Null
        };

        let mut fields = Fields::new();
        fields.insert("allowMissingFiles".into(), self.allow_missing_files.into());
        fields.insert("autoUpdatePackage".into(), self.auto_update_package.into());
        fields.insert("checkOnly".into(), self.check_only.into());
        fields.insert("ignoreWarnings".into(), self.ignore_warnings.into());
        fields.insert("performRetrieve".into(), self.perform_retrieve.into());
        fields.insert("purgeOnDelete".into(), self.purge_on_delete.into());
        fields.insert("rollbackOnError".into(), self.rollback_on_error.into());
        fields.insert("runAllTests".into(), self.run_all_tests.into());
        fields.insert("runTests".into(), run_tests);
        fields.insert("singlePackage".into(), self.single_package.into());
        fields.insert(
            "testLevel".into(),
            self.test_level.map(|level| level.to_string()).into(),
        );
        Value::Struct(fields)
    }
}

/// A deployable zip archive, in memory or on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeployArchive {
    Bytes(Vec<u8>),
    Path(PathBuf),
}

impl DeployArchive {
    /// Archive contents. A path must name an existing regular file.
    pub(crate) async fn into_bytes(self) -> Result<Vec<u8>> {
        match self {
            DeployArchive::Bytes(bytes) => Ok(bytes),
            DeployArchive::Path(path) => {
                let is_file = tokio::fs::metadata(&path)
                    .await
                    .map(|meta| meta.is_file())
                    .unwrap_or(false);
                if !is_file {
                    return Err(Error::new(ErrorKind::Io(format!(
                        "Deploy archive is not a file: {}",
                        path.display()
                    ))));
                }
                Ok(tokio::fs::read(&path).await?)
            }
        }
    }
}

impl From<Vec<u8>> for DeployArchive {
    fn from(bytes: Vec<u8>) -> Self {
        DeployArchive::Bytes(bytes)
    }
}

impl From<&[u8]> for DeployArchive {
    fn from(bytes: &[u8]) -> Self {
        DeployArchive::Bytes(bytes.to_vec())
    }
}

impl From<PathBuf> for DeployArchive {
    fn from(path: PathBuf) -> Self {
        DeployArchive::Path(path)
    }
}

impl From<&Path> for DeployArchive {
    fn from(path: &Path) -> Self {
        DeployArchive::Path(path.to_path_buf())
    }
}

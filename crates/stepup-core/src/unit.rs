use std::fmt;

use crate::errors::{DiscoveryError, HookError};
use crate::repository::parse_repository;

type Hook = Box<dyn Fn() -> Result<(), HookError>>;

pub struct UpgradeUnit {
    pub id: String,
    pub repository: String,
    pub depends_on: Vec<String>,
    info: Box<dyn Fn() -> String>,
    do_upgrade: Hook,
    estimate: Option<Box<dyn Fn() -> u64>>,
    pre_upgrade: Option<Hook>,
    post_upgrade: Option<Hook>,
}

impl UpgradeUnit {
    pub fn new<D, S>(
        id: impl Into<String>,
        depends_on: D,
        info: impl Fn() -> String + 'static,
        do_upgrade: impl Fn() -> Result<(), HookError> + 'static,
    ) -> Result<Self, DiscoveryError>
    where
        D: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let id = id.into();
        let repository = parse_repository(&id)?;
        Ok(Self {
            id,
            repository,
            depends_on: depends_on.into_iter().map(Into::into).collect(),
            info: Box::new(info),
            do_upgrade: Box::new(do_upgrade),
            estimate: None,
            pre_upgrade: None,
            post_upgrade: None,
        })
    }

    pub fn with_estimate(mut self, estimate: impl Fn() -> u64 + 'static) -> Self {
        self.estimate = Some(Box::new(estimate));
        self
    }

    pub fn with_pre_upgrade(
        mut self,
        pre_upgrade: impl Fn() -> Result<(), HookError> + 'static,
    ) -> Self {
        self.pre_upgrade = Some(Box::new(pre_upgrade));
        self
    }

    pub fn with_post_upgrade(
        mut self,
        post_upgrade: impl Fn() -> Result<(), HookError> + 'static,
    ) -> Self {
        self.post_upgrade = Some(Box::new(post_upgrade));
        self
    }

    pub fn info(&self) -> String {
        (self.info)()
    }

    pub fn do_upgrade(&self) -> Result<(), HookError> {
        (self.do_upgrade)()
    }

    pub fn estimate(&self) -> Option<u64> {
        self.estimate.as_ref().map(|estimate| estimate())
    }

    pub fn pre_upgrade(&self) -> Option<Result<(), HookError>> {
        self.pre_upgrade.as_ref().map(|hook| hook())
    }

    pub fn post_upgrade(&self) -> Option<Result<(), HookError>> {
        self.post_upgrade.as_ref().map(|hook| hook())
    }
}

impl fmt::Debug for UpgradeUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UpgradeUnit")
            .field("id", &self.id)
            .field("repository", &self.repository)
            .field("depends_on", &self.depends_on)
            .finish_non_exhaustive()
    }
}

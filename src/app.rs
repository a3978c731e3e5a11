use crate::config::Config;
use crate::ops::git::GitOps;

pub struct App<G: GitOps> {
    pub config: Config,
    pub git: G,
}

impl<G: GitOps> App<G> {
    pub fn new(config: Config, git: G) -> Self {
        Self { config, git }
    }
}

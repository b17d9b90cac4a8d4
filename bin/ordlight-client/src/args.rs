use std::path::PathBuf;

use argh::FromArgs;

use ordlight_config::Config;

#[derive(Debug, Clone, FromArgs)]
#[argh(description = "Ordinals light client")]
pub struct Args {
    #[argh(option, short = 'c', description = "path to configuration")]
    pub config: PathBuf,

    #[argh(option, description = "deny list path override")]
    pub deny_list: Option<String>,
}

impl Args {
    pub fn override_config(&self, config: &mut Config) {
        if let Some(deny_list) = &self.deny_list {
            config.reconcile.deny_list_path = deny_list.clone();
        }
    }
}

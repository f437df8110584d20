#![allow(dead_code, unreachable_pub)]

use modkit_domain::config::ModulesConfig;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// A throwaway application tree: `{root}/Modules/...` plus `{root}/Providers`.
pub struct AppTree {
    dir: TempDir,
}

impl AppTree {
    pub fn new() -> Self {
        let dir = tempfile::tempdir().expect("tempdir");
        fs::create_dir_all(dir.path().join("Modules")).expect("modules dir");
        Self { dir }
    }

    pub fn root(&self) -> &Path {
        self.dir.path()
    }

    pub fn modules_path(&self) -> PathBuf {
        self.dir.path().join("Modules")
    }

    pub fn config<const N: usize>(&self, modules: [&str; N]) -> ModulesConfig {
        ModulesConfig {
            base_path: self.modules_path(),
            app_path: self.root().to_path_buf(),
            modules: modules.iter().map(|name| (*name).to_owned()).collect(),
            ..ModulesConfig::default()
        }
    }

    /// Creates an empty file (and its parents) below `Modules/`.
    pub fn touch(&self, relative: &str) -> PathBuf {
        self.write(relative, "")
    }

    pub fn write(&self, relative: &str, contents: &str) -> PathBuf {
        let path = self.modules_path().join(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("parent dir");
        }
        fs::write(&path, contents).expect("write file");
        path
    }

    pub fn mkdir(&self, relative: &str) -> PathBuf {
        let path = self.modules_path().join(relative);
        fs::create_dir_all(&path).expect("mkdir");
        path
    }

    /// Writes `{root}/Providers/bindings.toml`.
    pub fn app_manifest(&self, contents: &str) {
        let dir = self.root().join("Providers");
        fs::create_dir_all(&dir).expect("providers dir");
        fs::write(dir.join("bindings.toml"), contents).expect("write manifest");
    }
}

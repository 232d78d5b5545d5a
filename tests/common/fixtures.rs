//! Fixture data directories
//!
//! Lays out `<root>/size-analyzer/analysis_index.json` and
//! `<root>/size-analyzer/<platform>/<version>.csv` the way the release
//! tooling produces them.

#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Re-export anyhow for convenience
pub use anyhow;

/// A temporary project root containing a data directory
pub struct DataDir {
    temp: TempDir,
}

impl DataDir {
    /// Empty project root with an empty data directory
    pub fn empty() -> anyhow::Result<Self> {
        let temp = TempDir::new()?;
        fs::create_dir_all(temp.path().join("size-analyzer"))?;
        Ok(Self { temp })
    }

    /// Two platforms with a few versions each
    ///
    /// linux (bloaty-style columns):
    /// - 1.0: src/a.cpp 100, dir1/x.o 1000, src/gone.cpp 200
    /// - 1.1: no snapshot on disk
    /// - 1.2: ../src/a.cpp 150, dir2/x.o 1040, src/new.cpp 30
    /// - 1.10: src/a.cpp 90
    ///
    /// osx (compressed/uncompressed columns): 2.0-beta and 2.0.
    pub fn standard() -> anyhow::Result<Self> {
        let data = Self::empty()?;
        data.write_index(
            r#"{
  "platforms": {
    "linux": {"versions": ["1.10", "1.0", {"version": "1.1", "sha1": "deadbeef"}, "1.2"]},
    "osx": {"versions": ["2.0", "2.0-beta"]}
  }
}"#,
        )?;
        data.write_snapshot(
            "linux",
            "1.0",
            "compileunits,vmsize,filesize\n\
             src/a.cpp,100,80\n\
             dir1/x.o,1000,900\n\
             src/gone.cpp,200,150\n",
        )?;
        data.write_snapshot(
            "linux",
            "1.2",
            "compileunits,vmsize,filesize\n\
             ../src/a.cpp,150,85\n\
             dir2/x.o,1040,910\n\
             src/new.cpp,30,20\n\
             broken,row\n",
        )?;
        data.write_snapshot("linux", "1.10", "compileunits,vmsize,filesize\nsrc/a.cpp,90,70\n")?;
        data.write_snapshot(
            "osx",
            "2.0-beta",
            "filename,compressed,uncompressed\n\"lib/a,b.dylib\",10,40\n",
        )?;
        data.write_snapshot(
            "osx",
            "2.0",
            "filename,compressed,uncompressed\n\"lib/a,b.dylib\",12,44\n",
        )?;
        Ok(data)
    }

    /// Project root (the working directory for the binary)
    pub fn root(&self) -> &Path {
        self.temp.path()
    }

    /// The data directory
    pub fn data_dir(&self) -> PathBuf {
        self.root().join("size-analyzer")
    }

    /// Write the analysis index
    pub fn write_index(&self, json: &str) -> anyhow::Result<()> {
        fs::write(self.data_dir().join("analysis_index.json"), json)?;
        Ok(())
    }

    /// Write one snapshot
    pub fn write_snapshot(&self, platform: &str, version: &str, csv: &str) -> anyhow::Result<()> {
        let dir = self.data_dir().join(platform);
        fs::create_dir_all(&dir)?;
        fs::write(dir.join(format!("{}.csv", version)), csv)?;
        Ok(())
    }

    /// Write `.size-analyzer.toml` in the project root
    pub fn write_config(&self, toml: &str) -> anyhow::Result<()> {
        fs::write(self.root().join(".size-analyzer.toml"), toml)?;
        Ok(())
    }
}

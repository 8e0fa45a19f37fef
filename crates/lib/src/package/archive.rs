//! Archive writer: bundles a platform binary with resources into one file.
//!
//! Linux targets get a `.tar.gz`, everything else a `.zip`. The binary sits at
//! the archive root with mode 0755; resources keep their workspace-relative paths.

use std::fs::{self, File};
use std::io;
use std::path::{Path, PathBuf};

use flate2::Compression;
use flate2::write::GzEncoder;
use thiserror::Error;
use tracing::{debug, warn};
use zip::CompressionMethod;
use zip::ZipWriter;
use zip::write::SimpleFileOptions;

use crate::package::resources::{Resource, ResourceError};
use crate::platform::Platform;
use crate::platform::os::Os;

const EXECUTABLE_MODE: u32 = 0o755;
const RESOURCE_MODE: u32 = 0o644;

#[derive(Debug, Error)]
pub enum ArchiveError {
  #[error("binary {} does not exist", path.display())]
  MissingBinary { path: PathBuf },

  #[error(transparent)]
  Resources(#[from] ResourceError),

  #[error("failed writing archive {}: {source}", path.display())]
  Io {
    path: PathBuf,
    #[source]
    source: io::Error,
  },

  #[error("failed writing archive {}: {source}", path.display())]
  Zip {
    path: PathBuf,
    #[source]
    source: zip::result::ZipError,
  },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArchiveFormat {
  Zip,
  TarGz,
}

impl ArchiveFormat {
  pub fn for_os(os: Os) -> Self {
    match os {
      Os::Linux => ArchiveFormat::TarGz,
      _ => ArchiveFormat::Zip,
    }
  }

  pub fn extension(&self) -> &'static str {
    match self {
      ArchiveFormat::Zip => ".zip",
      ArchiveFormat::TarGz => ".tar.gz",
    }
  }
}

/// Archive file name for a platform, e.g. `demo_linux_amd64.tar.gz`.
pub fn archive_name(app_name: &str, platform: &Platform) -> String {
  format!(
    "{}_{}{}",
    app_name,
    platform.key(),
    ArchiveFormat::for_os(platform.os).extension()
  )
}

/// Inputs for one archive.
#[derive(Debug)]
pub struct ArchiveRequest<'a> {
  /// Directory the archive is written into.
  pub dest_dir: &'a Path,
  pub binary: &'a Path,
  pub app_name: &'a str,
  pub platform: &'a Platform,
  pub resources: &'a [Resource],
  /// Delete the raw binary once the archive is complete.
  pub remove_binary: bool,
}

/// Write the archive and return its path.
///
/// A partially written archive is removed on failure.
pub fn write_archive(req: &ArchiveRequest<'_>) -> Result<PathBuf, ArchiveError> {
  if !req.binary.is_file() {
    return Err(ArchiveError::MissingBinary {
      path: req.binary.to_path_buf(),
    });
  }

  let path = req.dest_dir.join(archive_name(req.app_name, req.platform));
  let binary_name = req
    .binary
    .file_name()
    .map(|n| n.to_string_lossy().into_owned())
    .unwrap_or_else(|| req.app_name.to_string());

  debug!(archive = %path.display(), resources = req.resources.len(), "writing archive");

  let written = match ArchiveFormat::for_os(req.platform.os) {
    ArchiveFormat::Zip => write_zip(&path, req.binary, &binary_name, req.resources),
    ArchiveFormat::TarGz => write_tar_gz(&path, req.binary, &binary_name, req.resources),
  };
  if let Err(e) = written {
    let _ = fs::remove_file(&path);
    return Err(e);
  }

  if req.remove_binary {
    if let Err(e) = fs::remove_file(req.binary) {
      warn!(binary = %req.binary.display(), error = %e, "could not remove binary after archiving");
    } else if let Some(parent) = req.binary.parent() {
      // Only succeeds once the platform directory is empty.
      let _ = fs::remove_dir(parent);
    }
  }

  Ok(path)
}

fn write_zip(path: &Path, binary: &Path, binary_name: &str, resources: &[Resource]) -> Result<(), ArchiveError> {
  let io_err = |source| ArchiveError::Io {
    path: path.to_path_buf(),
    source,
  };
  let zip_err = |source| ArchiveError::Zip {
    path: path.to_path_buf(),
    source,
  };

  let file = File::create(path).map_err(io_err)?;
  let mut zip = ZipWriter::new(file);
  let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

  zip
    .start_file(binary_name, options.unix_permissions(EXECUTABLE_MODE))
    .map_err(zip_err)?;
  io::copy(&mut File::open(binary).map_err(io_err)?, &mut zip).map_err(io_err)?;

  for resource in resources {
    zip
      .start_file(resource.name.as_str(), options.unix_permissions(RESOURCE_MODE))
      .map_err(zip_err)?;
    io::copy(&mut File::open(&resource.source).map_err(io_err)?, &mut zip).map_err(io_err)?;
  }

  zip.finish().map_err(zip_err)?;
  Ok(())
}

fn write_tar_gz(path: &Path, binary: &Path, binary_name: &str, resources: &[Resource]) -> Result<(), ArchiveError> {
  let io_err = |source| ArchiveError::Io {
    path: path.to_path_buf(),
    source,
  };

  let file = File::create(path).map_err(io_err)?;
  let mut tar = tar::Builder::new(GzEncoder::new(file, Compression::default()));

  append_file(&mut tar, binary, binary_name, EXECUTABLE_MODE).map_err(io_err)?;
  for resource in resources {
    append_file(&mut tar, &resource.source, &resource.name, RESOURCE_MODE).map_err(io_err)?;
  }

  let encoder = tar.into_inner().map_err(io_err)?;
  encoder.finish().map_err(io_err)?;
  Ok(())
}

fn append_file<W: io::Write>(tar: &mut tar::Builder<W>, source: &Path, name: &str, mode: u32) -> io::Result<()> {
  let mut file = File::open(source)?;
  let mut header = tar::Header::new_gnu();
  header.set_size(file.metadata()?.len());
  header.set_mode(mode);
  header.set_entry_type(tar::EntryType::Regular);
  tar.append_data(&mut header, name, &mut file)
}

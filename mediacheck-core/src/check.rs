use std::io;

use tracing::{debug, info, info_span, warn};

use crate::collection::{MediaCheckOutput, MediaCollection};
use crate::config::{CheckConfig, RestorePolicy};
use crate::working_dir::WorkingDirGuard;

/// Run the collection's media check from inside its media directory.
///
/// The working directory is restored afterwards, on success and on failure.
/// Errors from the collection, and `io::Error`s from changing directory, are
/// returned as the collection's own error type.
pub fn check_media<C>(collection: &mut C) -> Result<MediaCheckOutput, C::Error>
where
    C: MediaCollection + ?Sized,
{
    check_media_with(collection, &CheckConfig::default())
}

/// [`check_media`] with settings from [`CheckConfig::load_from_env`].
///
/// The configuration is resolved before the working directory moves. A bad
/// configuration surfaces as an `io::Error` of kind `InvalidInput` (or the
/// read error's kind) converted into the collection's error.
pub fn check_media_from_env<C>(
    collection: &mut C,
) -> Result<MediaCheckOutput, C::Error>
where
    C: MediaCollection + ?Sized,
{
    let (config, source) = CheckConfig::load_from_env().map_err(io::Error::from)?;
    debug!(?source, restore = %config.restore, "loaded media check config");
    check_media_with(collection, &config)
}

/// [`check_media`] with explicit settings.
///
/// `media_dir()` is asked for first and the current directory is recorded
/// afterwards, right before entering the media directory. A collection that
/// cannot name its media directory therefore never causes a directory change,
/// and the directory restored is the one current at the moment of entry.
///
/// With [`RestorePolicy::SuccessOnly`] a failed check leaves the process in
/// the media directory. A panic inside the check restores under either
/// policy. If the check succeeds but the previous directory can no longer be
/// entered, that `io::Error` is returned and the process stays in the media
/// directory.
pub fn check_media_with<C>(
    collection: &mut C,
    config: &CheckConfig,
) -> Result<MediaCheckOutput, C::Error>
where
    C: MediaCollection + ?Sized,
{
    let media_dir = collection.media_dir()?;

    let span = info_span!(
        "check_media",
        media_dir = %media_dir.display(),
        restore = %config.restore
    );
    let _span = span.enter();

    let guard = WorkingDirGuard::enter(&media_dir)?;

    let result = match collection.check_media() {
        Ok(result) => result,
        Err(err) => {
            if config.restore == RestorePolicy::SuccessOnly {
                let left_in = guard.keep();
                warn!(
                    cwd = %left_in.display(),
                    "media check failed; working directory not restored"
                );
            } else {
                debug!("media check failed");
            }
            return Err(err);
        }
    };

    guard.restore()?;

    info!(
        missing = result.missing.len(),
        unused = result.unused.len(),
        "media check finished"
    );
    if config.log_report {
        debug!(report = %result.report, "media check report");
    }

    Ok(result.into_parts())
}

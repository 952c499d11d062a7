//! Command construction for images.

use capstan_core::ImageSpec;

use crate::line::CommandLine;
use crate::option::flag;

/// Options for `image rm`.
#[derive(Debug, Clone, Default)]
pub struct RmOptions {
    /// Remove the image even if containers use it.
    pub force: bool,
}

/// Builds the `pull` command.
pub fn pull(image: &ImageSpec) -> CommandLine {
    let mut cmd = CommandLine::new("image", "pull");
    cmd.push(image.reference());
    cmd
}

/// Builds the `rm` command.
pub fn rm(image: &ImageSpec, opts: &RmOptions) -> CommandLine {
    let mut cmd = CommandLine::new("image", "rm");
    cmd.push_opt(flag("force", opts.force));
    cmd.push(image.reference());
    cmd
}

/// Builds the `inspect` command used to read live state for a reference.
pub fn inspect(reference: &str) -> CommandLine {
    let mut cmd = CommandLine::new("image", "inspect");
    cmd.push(reference);
    cmd
}

/// Builds the listing command used for discovery.
pub fn ls() -> CommandLine {
    let mut cmd = CommandLine::new("image", "ls");
    cmd.push("--format=json");
    cmd
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pull() {
        let image = ImageSpec::new("docker.io/library/alpine:latest");
        assert_eq!(
            pull(&image).to_string(),
            "/usr/bin/podman image pull docker.io/library/alpine:latest"
        );
    }

    #[test]
    fn test_rm() {
        let image = ImageSpec::new("alpine:3.19");
        assert_eq!(
            rm(&image, &RmOptions::default()).to_string(),
            "/usr/bin/podman image rm alpine:3.19"
        );
        assert_eq!(
            rm(&image, &RmOptions { force: true }).to_string(),
            "/usr/bin/podman image rm --force alpine:3.19"
        );
    }

    #[test]
    fn test_listing() {
        assert_eq!(ls().to_string(), "/usr/bin/podman image ls --format=json");
    }
}

//src/runner.rs

use std::process::Command;

use crate::error::DeblurError;

/// Capability for running one external workflow invocation to completion.
///
/// The argv is the full token list from
/// [`build_workflow_argv`](crate::command::build_workflow_argv), executable
/// name first. Implementations must block until the process exits and map a
/// non-zero status to [`DeblurError::WorkflowFailed`]. Tests substitute a
/// fake that writes a canned table instead of invoking a real binary.
pub trait WorkflowRunner {
    fn run(&self, argv: &[String]) -> Result<(), DeblurError>;
}

/// The real thing: spawns the executable via `std::process::Command`,
/// inheriting stdout/stderr, and waits synchronously. No timeout and no
/// cancellation; the caller is blocked until deblur exits.
#[derive(Debug, Default)]
pub struct SubprocessRunner;

impl WorkflowRunner for SubprocessRunner {
    fn run(&self, argv: &[String]) -> Result<(), DeblurError> {
        log::info!("running: {}", argv.join(" "));

        let status = Command::new(&argv[0])
            .args(&argv[1..])
            .status()
            .map_err(DeblurError::Spawn)?;

        if !status.success() {
            // On unix a signal kill leaves no exit code.
            let code = status.code().unwrap_or(-1);
            log::error!("deblur workflow failed with status {code}");
            return Err(DeblurError::WorkflowFailed { status: code });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nonzero_exit_is_fatal() {
        let argv = vec!["false".to_string()];
        let err = SubprocessRunner.run(&argv).unwrap_err();
        match err {
            DeblurError::WorkflowFailed { status } => assert_eq!(status, 1),
            other => panic!("expected WorkflowFailed, got {other:?}"),
        }
    }

    #[test]
    fn zero_exit_is_ok() {
        let argv = vec!["true".to_string()];
        assert!(SubprocessRunner.run(&argv).is_ok());
    }

    #[test]
    fn missing_executable_is_spawn_error() {
        let argv = vec!["definitely-not-a-real-binary-9f2c".to_string()];
        let err = SubprocessRunner.run(&argv).unwrap_err();
        assert!(matches!(err, DeblurError::Spawn(_)));
    }
}

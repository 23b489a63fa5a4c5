//! Demo scenarios.
//!
//! Each scenario writes its transcript to `out`. The `App` collaborator only
//! exists to give the wrapped handles something to point at.

use std::io::{self, Write};

use notnull_types::{NotNull, catch_violation};

pub struct App {
    name: String,
}

impl App {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn run(&self, out: &mut impl Write) -> io::Result<()> {
        writeln!(out, "Running {}", self.name)
    }

    pub fn shutdown(&self, out: &mut impl Write) -> io::Result<()> {
        writeln!(out, "App {} is closing...", self.name)
    }

    pub fn diagnose(&self, out: &mut impl Write) -> io::Result<()> {
        writeln!(out, "Diagnosing {}...", self.name)
    }
}

#[derive(Debug, Default)]
pub struct TestParams {
    pub verbose: bool,
}

/// Stand-in for a broader error-reporting routine.
pub fn report_error(out: &mut impl Write, message: &str) -> io::Result<()> {
    tracing::error!(reported = message, "Reported error");
    writeln!(out, "Reported: {message}")
}

/// The unwrapped way: every callee re-checks its inputs.
pub fn test_app_check(
    app: Option<&App>,
    params: Option<&TestParams>,
    out: &mut impl Write,
) -> io::Result<()> {
    match (app, params) {
        (Some(app), Some(_)) => writeln!(out, "Checked inputs for {}", app.name()),
        _ => report_error(out, "null input params"),
    }
}

/// Both inputs are non-null by type; the body does no checks.
pub fn test_app(
    app: NotNull<Option<&App>>,
    params: NotNull<Option<&TestParams>>,
    out: &mut impl Write,
) -> io::Result<()> {
    let mode = if params.as_some().verbose {
        "verbose"
    } else {
        "default"
    };
    writeln!(out, "Testing {} with {mode} params", app.as_some().name())
}

pub fn run_app(app: NotNull<Option<&App>>, out: &mut impl Write) -> io::Result<()> {
    let app = app.into_some();
    app.run(out)?;
    app.shutdown(out)
}

pub fn diagnose_app(app: NotNull<*const App>, out: &mut impl Write) -> io::Result<()> {
    // SAFETY: callers build `app` from a live reference that outlives this call.
    let app = unsafe { app.as_ref() };
    app.diagnose(out)
}

/// Valid handles only: every call goes through without a violation.
pub fn checked(out: &mut impl Write) -> io::Result<()> {
    let app = Box::new(App::new("Poker"));
    let params = Box::new(TestParams::default());

    test_app_check(Some(&*app), Some(&*params), out)?;
    test_app(NotNull::some(&*app), NotNull::some(&*params), out)?;
    run_app(NotNull::some(&*app), out)?;
    diagnose_app(NotNull::from(&*app), out)?;

    writeln!(out, "Finished...")
}

/// The owning handle is reset before the calls, so converting it to a
/// `NotNull` parameter violates the contract at run time. What happens next
/// is up to the installed policy.
pub fn violation(out: &mut impl Write) -> io::Result<()> {
    let mut my_app = Some(Box::new(App::new("Poker")));
    let my_params = Some(Box::new(TestParams::default()));

    test_app_check(my_app.as_deref(), my_params.as_deref(), out)?;

    drop(my_app.take());
    tracing::info!("Owning handle reset");

    let outcome = catch_violation(|| -> io::Result<()> {
        test_app(
            NotNull::new(my_app.as_deref()),
            NotNull::new(my_params.as_deref()),
            out,
        )?;
        run_app(NotNull::new(my_app.as_deref()), out)
    });

    match outcome {
        Ok(result) => result?,
        Err(violation) => {
            writeln!(out, "{violation}")?;
            report_error(out, "null input params")?;
        }
    }

    writeln!(out, "Finished...")
}

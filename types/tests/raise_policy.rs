//! Contract behavior with the raise policy installed.
//!
//! The policy is process-wide, so every test in this binary installs the same
//! one.

use std::cell::{Cell, RefCell};
use std::ptr;

use notnull_types::{
    ContractViolation, NotNull, Operation, ViolationPolicy, catch_violation, policy,
};

fn install_raise() {
    policy::install(ViolationPolicy::Raise).expect("raise is the only policy in this binary");
}

struct App {
    name: &'static str,
    journal: RefCell<Vec<String>>,
}

impl App {
    fn new(name: &'static str) -> Self {
        Self {
            name,
            journal: RefCell::new(Vec::new()),
        }
    }

    fn run(&self) {
        self.journal.borrow_mut().push(format!("Running {}", self.name));
    }

    fn shutdown(&self) {
        self.journal
            .borrow_mut()
            .push(format!("App {} is closing...", self.name));
    }

    fn entries(&self) -> Vec<String> {
        self.journal.borrow().clone()
    }
}

struct TestParams {
    label: &'static str,
}

fn run_app(app: NotNull<Option<&App>>) {
    let app = app.into_some();
    app.run();
    app.shutdown();
}

/// Records where a caught violation came from, the way a caller would hand
/// it to a wider error-reporting routine.
fn report_error(reports: &RefCell<Vec<String>>, violation: &ContractViolation) {
    reports.borrow_mut().push(format!(
        "{} {} at line {}",
        violation.operation(),
        violation.type_name(),
        violation.location().line()
    ));
}

fn test_app(app: NotNull<Option<&App>>, params: NotNull<Option<&TestParams>>) {
    app.as_some()
        .journal
        .borrow_mut()
        .push(format!("Testing with {}", params.as_some().label));
}

#[test]
fn construct_returns_value_unchanged() {
    install_raise();
    let app = App::new("Poker");
    let raw: *const App = &raw const app;

    let handle = NotNull::new(raw);
    assert!(ptr::eq(handle.into_inner(), raw));
}

#[test]
fn two_valid_parameters_run_in_written_order() {
    install_raise();
    let app = App::new("Poker");
    let params = TestParams { label: "defaults" };

    test_app(NotNull::some(&app), NotNull::some(&params));
    run_app(NotNull::new(Some(&app)));

    assert_eq!(
        app.entries(),
        [
            "Testing with defaults",
            "Running Poker",
            "App Poker is closing...",
        ]
    );
}

#[test]
fn runtime_null_parameter_is_caught_and_reported() {
    install_raise();
    let mut my_app = Some(Box::new(App::new("Poker")));
    let my_params = Some(Box::new(TestParams { label: "defaults" }));
    let reached_body = Cell::new(false);
    let reports = RefCell::new(Vec::new());

    drop(my_app.take());

    let construct_line = line!() + 3;
    let outcome = catch_violation(|| {
        test_app(
            NotNull::new(my_app.as_deref()),
            NotNull::new(my_params.as_deref()),
        );
        reached_body.set(true);
        run_app(NotNull::new(my_app.as_deref()));
    });

    match outcome {
        Ok(()) => panic!("null app must not reach test_app"),
        Err(violation) => {
            assert!(!violation.to_string().is_empty());
            assert_eq!(violation.operation(), Operation::Construct);
            report_error(&reports, &violation);
        }
    }

    assert!(!reached_body.get());
    let reports = reports.into_inner();
    assert_eq!(reports.len(), 1);
    assert!(reports[0].starts_with("construct "), "{reports:?}");
    assert!(reports[0].contains("App"), "{reports:?}");
    assert!(
        reports[0].ends_with(&format!("at line {construct_line}")),
        "{reports:?}"
    );
}

#[test]
fn failed_assignment_keeps_previous_handle() {
    install_raise();
    let first = App::new("first");
    let mut handle = NotNull::new(Some(&first));
    let computed: Option<&App> = None;

    let violation = catch_violation(|| handle.set(computed)).unwrap_err();

    assert_eq!(violation.operation(), Operation::Assign);
    assert_eq!(handle.as_some().name, "first");
}

#[test]
fn try_new_does_not_consult_the_policy() {
    install_raise();
    let missing: Option<Box<App>> = None;
    assert!(NotNull::try_new(missing).is_err());
}

//! Mock functions, transports, injected collaborators and partial doubles

use super::{fixture, Outcome};
use crate::demo::http::{ApiClient, HttpError, Request, Response};
use crate::demo::math;
use crate::demo::storage::MockStorage;
use crate::demo::users::{User, UserManager};
use serde_json::json;
use std::sync::{Arc, Mutex};
use verdict_runtime::prelude::*;

pub(super) fn register(runner: &mut TestRunner) {
    register_function_mocks(runner);
    register_api_mocks(runner);
    register_dependency_injection(runner);
    register_partial_mocks(runner);
    register_storage(runner);
}

// ============================================================================
// Function mocks
// ============================================================================

fn process_data(items: &[Value], callback: &Mock<(Value,), Value>) -> Result<Vec<Value>, TestError> {
    items.iter().map(|item| callback.call((item.clone(),))).collect()
}

fn register_function_mocks(runner: &mut TestRunner) {
    runner.describe("Function Mocks", |s| {
        s.it("should record every callback invocation", || -> Outcome {
            let callback = Mock::<(Value,), Value>::with_implementation(|(v,)| {
                Ok(Value::from(v.as_number().unwrap_or_default() * 2.0))
            });
            let items = [Value::from(1), Value::from(2), Value::from(3)];

            let out = process_data(&items, &callback)?;
            expect(out).to_equal(vec![2, 4, 6])?;
            expect(callback.call_count()).to_be(3)?;
            expect(callback.nth_call(0).map(|(v,)| v)).to_be(1)?;
            expect(callback.last_call().map(|(v,)| v)).to_be(3)?;
            Ok(())
        });

        s.it("should return scripted values in sequence", || -> Outcome {
            let mock: Mock<(), Value> = Mock::new();
            mock.mock_return_value("default".into())
                .mock_return_value_once("first".into())
                .mock_return_value_once("second".into());

            let seen = (0..4).map(|_| mock.call(())).collect::<Result<Vec<_>, _>>()?;
            expect(seen).to_equal(vec!["first", "second", "default", "default"])?;
            Ok(())
        });

        s.it("should behave like a plain function", || -> Outcome {
            let mock = Mock::<Vec<Value>, Value>::with_implementation(|args| Ok(args.len().into()))
                .with_name("argCounter");
            let f = mock.as_function();

            expect(f.to_display_string()).to_be("[Function: argCounter]")?;
            let called = f
                .as_function()
                .map(|func| func.call(&[Value::from("a"), Value::Null]))
                .transpose()?;
            expect(called).to_be(2)?;
            expect(mock.was_called()).to_be_truthy()?;
            Ok(())
        });

        s.describe("Async", |s| {
            s.it_async("should resolve and reject once-values in order", || async {
                let mock: Mock<(), Promise<Value>> = Mock::new();
                mock.mock_resolved_value_once(Value::from("ready"))
                    .mock_rejected_value_once(TestError::error("boom"));

                expect(mock.call(())?.await?).to_be("ready")?;
                match mock.call(())?.await {
                    Ok(v) => return Err(TestError::error(format!("expected rejection, got {}", v))),
                    Err(e) => expect(e.message()).to_be("boom")?,
                }
                expect(mock.call(())?.await?).to_be_undefined()?;
                Outcome::Ok(())
            });
        });
    });
}

// ============================================================================
// API mocks
// ============================================================================

type FetchMock = Mock<(Request,), Promise<Response>>;

fn register_api_mocks(runner: &mut TestRunner) {
    runner.describe("API Mocking", |s| {
        s.it_async("should stub the transport", || async {
            let fetch = FetchMock::new();
            let users = json!([
                {"id": 1, "name": "John Doe"},
                {"id": 2, "name": "Jane Smith"},
                {"id": 3, "name": "Bob Johnson"}
            ]);
            fetch.mock_resolved_value(Response::new(200, users));

            let client = ApiClient::new(fetch.clone()).with_base_url("https://api.example.com");
            let all = client.get("/users").await.or_raise()?;
            expect(all.clone()).to_have_length(3)?;
            expect(all.get("0")).to_have_property_value("name", "John Doe")?;

            let url = fetch.last_call().map(|(r,)| r.url);
            expect(url).to_be("https://api.example.com/users")?;
            Outcome::Ok(())
        });

        s.it_async("should surface transport rejections", || async {
            let fetch = FetchMock::new();
            fetch.mock_rejected_value(TestError::error("Network error"));

            let result = ApiClient::new(fetch).get("/users").await;
            if result != Err(HttpError::Transport("Network error".into())) {
                return Err(TestError::error(format!("unexpected result {:?}", result)));
            }
            Outcome::Ok(())
        });
    });
}

// ============================================================================
// Dependency injection
// ============================================================================

trait Logger: Send + Sync {
    fn log(&self, message: &str) -> Result<(), TestError>;
    fn error(&self, message: &str) -> Result<(), TestError>;
}

/// Service that reports through an injected [`Logger`].
struct UserService<L> {
    logger: L,
    users: UserManager,
}

impl<L: Logger> UserService<L> {
    fn new(logger: L) -> Self {
        Self {
            logger,
            users: UserManager::new(),
        }
    }

    /// Logger failures abort the operation and reach the caller.
    fn create_user(&mut self, name: &str, email: &str) -> Result<User, TestError> {
        self.logger.log(&format!("Creating user: {}", name))?;
        match self.users.add_user(name, email) {
            Ok(user) => {
                self.logger.log(&format!("User created: {}", user.id))?;
                Ok(user)
            }
            Err(err) => {
                self.logger.error(&format!("Failed to create user: {}", err))?;
                Err(TestError::raise(err))
            }
        }
    }
}

#[derive(Clone, Default)]
struct MockLogger {
    log: Mock<(String,), ()>,
    error: Mock<(String,), ()>,
}

impl Logger for MockLogger {
    fn log(&self, message: &str) -> Result<(), TestError> {
        self.log.call((message.to_string(),))
    }

    fn error(&self, message: &str) -> Result<(), TestError> {
        self.error.call((message.to_string(),))
    }
}

fn messages(mock: &Mock<(String,), ()>) -> Vec<String> {
    mock.calls().into_iter().map(|(m,)| m).collect()
}

fn register_dependency_injection(runner: &mut TestRunner) {
    runner.describe("Dependency Injection Mocking", |s| {
        s.it("should log successful creation", || -> Outcome {
            let logger = MockLogger::default();
            let mut service = UserService::new(logger.clone());

            let user = service.create_user("John", "john@example.com")?;
            expect(user.id).to_be(1)?;
            expect(messages(&logger.log)).to_equal(vec!["Creating user: John", "User created: 1"])?;
            expect(logger.error.was_called()).to_be_falsy()?;
            Ok(())
        });

        s.it("should log failures through the error channel", || -> Outcome {
            let logger = MockLogger::default();
            let mut service = UserService::new(logger.clone());

            let attempt = service.create_user("John", "not-an-email");
            expect(attempt.is_err()).to_be(true)?;
            expect(messages(&logger.error))
                .to_equal(vec!["Failed to create user: Invalid email format"])?;
            expect(logger.log.call_count()).to_be(1)?;
            Ok(())
        });

        s.it("should propagate logger failures", || -> Outcome {
            let logger = MockLogger::default();
            logger
                .log
                .mock_implementation(|_| Err(TestError::error("log sink down")));
            let mut service = UserService::new(logger.clone());

            let err = match service.create_user("John", "john@example.com") {
                Ok(user) => {
                    return Err(TestError::error(format!("unexpected user {:?}", user)));
                }
                Err(err) => err,
            };
            expect(err.message()).to_be("log sink down")?;
            expect(logger.log.call_count()).to_be(1)?;
            expect(service.users.all_users().len()).to_be(0)?;
            Ok(())
        });
    });
}

// ============================================================================
// Partial mocks
// ============================================================================

trait MathOps {
    fn add(&self, a: f64, b: f64) -> f64;
    fn multiply(&self, a: f64, b: f64) -> f64;

    fn complex_calculation(&self, x: f64) -> f64 {
        self.multiply(self.add(x, 5.0), 2.0)
    }
}

struct RealMath;

impl MathOps for RealMath {
    fn add(&self, a: f64, b: f64) -> f64 {
        math::add(a, b)
    }

    fn multiply(&self, a: f64, b: f64) -> f64 {
        math::multiply(a, b)
    }
}

/// Real `add`, mocked `multiply`.
struct PartialMath {
    multiply: Mock<(f64, f64), f64>,
}

impl MathOps for PartialMath {
    fn add(&self, a: f64, b: f64) -> f64 {
        RealMath.add(a, b)
    }

    fn multiply(&self, a: f64, b: f64) -> f64 {
        self.multiply.call((a, b)).unwrap_or_default()
    }
}

fn register_partial_mocks(runner: &mut TestRunner) {
    runner.describe("Partial Mocking", |s| {
        s.it("should compute with real operations", || {
            expect(RealMath.complex_calculation(5.0)).to_be(20)
        });

        s.it("should replace a single operation", || -> Outcome {
            let ops = PartialMath {
                multiply: Mock::new(),
            };
            ops.multiply.mock_return_value(100.0);

            expect(ops.complex_calculation(5.0)).to_be(100)?;
            let args = ops.multiply.nth_call(0).map(|(a, b)| vec![a, b]);
            expect(args).to_equal(vec![10, 2])?;
            Ok(())
        });
    });
}

// ============================================================================
// Storage
// ============================================================================

fn register_storage(runner: &mut TestRunner) {
    let storage = Arc::new(Mutex::new(MockStorage::new()));

    runner.describe("Storage Mocks", |s| {
        let st = storage.clone();
        s.after_each(move || -> Outcome {
            fixture(&st).clear();
            Ok(())
        });

        let st = storage.clone();
        s.it("should store and remove items", move || -> Outcome {
            let mut storage = fixture(&st);
            storage.set_item("token", "abc123");
            expect(storage.get_item("token")).to_be("abc123")?;

            expect(storage.remove_item("token")).to_be("abc123")?;
            expect(storage.get_item("token")).to_be_null()?;
            expect(storage.is_empty()).to_be_truthy()?;
            Ok(())
        });

        let st = storage.clone();
        s.it("should start every test empty", move || -> Outcome {
            let mut storage = fixture(&st);
            expect(storage.len()).to_be(0)?;
            storage.set_item("a", "1");
            storage.set_item("b", "2");
            expect(storage.key(1)).to_be("b")?;
            expect(storage.len()).to_be(2)?;
            Ok(())
        });
    });
}

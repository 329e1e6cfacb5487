//! Stateful subjects with per-test setup

use super::{fixture, Outcome};
use crate::demo::counter::Counter;
use crate::demo::users::{UserManager, UserUpdate};
use std::sync::{Arc, Mutex};
use verdict_runtime::prelude::*;

pub(super) fn register(runner: &mut TestRunner) {
    register_users(runner);
    register_counter(runner);
}

fn register_users(runner: &mut TestRunner) {
    let manager = Arc::new(Mutex::new(UserManager::new()));

    runner.describe("UserManager Integration", |s| {
        let m = manager.clone();
        s.before_each(move || -> Outcome {
            *fixture(&m) = UserManager::new();
            Ok(())
        });

        let m = manager.clone();
        s.it("should create and retrieve users", move || -> Outcome {
            let mut users = fixture(&m);
            let user = users.add_user("John Doe", "john@example.com").or_raise()?;
            expect(&user.name).to_be("John Doe")?;
            expect(&user.email).to_be("john@example.com")?;
            expect(user.id).to_be_defined()?;

            expect(users.get_user(user.id)).to_equal(&user)?;
            Ok(())
        });

        let m = manager.clone();
        s.it("should prevent duplicate emails", move || -> Outcome {
            fixture(&m).add_user("John", "john@example.com").or_raise()?;
            let m = m.clone();
            expect(thunk(move || fixture(&m).add_user("Jane", "john@example.com").or_raise()))
                .to_throw_matching("User with this email already exists")?;
            Ok(())
        });

        let m = manager.clone();
        s.it("should update user information", move || -> Outcome {
            let mut users = fixture(&m);
            let user = users.add_user("John", "john@example.com").or_raise()?;
            let update = UserUpdate {
                name: Some("John Smith".into()),
                ..Default::default()
            };
            let updated = users.update_user(user.id, update).or_raise()?;
            expect(&updated.name).to_be("John Smith")?;
            expect(&updated.email).to_be("john@example.com")?;
            Ok(())
        });

        let m = manager.clone();
        s.it("should remove users", move || -> Outcome {
            let mut users = fixture(&m);
            let user = users.add_user("John", "john@example.com").or_raise()?;
            let removed = users.remove_user(user.id).or_raise()?;
            expect(&removed).to_equal(&user)?;
            expect(users.get_user(user.id)).to_be_null()?;
            expect(users.all_users()).to_have_length(0)?;
            Ok(())
        });
    });
}

fn register_counter(runner: &mut TestRunner) {
    let counter = Arc::new(Mutex::new(Counter::new()));
    let notifications: Arc<Mutex<Vec<i64>>> = Arc::default();

    runner.describe("Counter with Observers", |s| {
        let (c, n) = (counter.clone(), notifications.clone());
        s.before_each(move || -> Outcome {
            fixture(&n).clear();
            let sink = n.clone();
            let mut counter = fixture(&c);
            *counter = Counter::new();
            counter.add_listener(move |value| fixture(&sink).push(value));
            Ok(())
        });

        let (c, n) = (counter.clone(), notifications.clone());
        s.it("should notify observers of changes", move || -> Outcome {
            {
                let mut counter = fixture(&c);
                counter.increment();
                counter.increment();
                counter.decrement();
                expect(counter.value()).to_be(1)?;
            }
            expect(fixture(&n).clone()).to_equal(vec![1, 2, 1])?;
            Ok(())
        });

        let (c, n) = (counter.clone(), notifications.clone());
        s.it("should handle multiple observers", move || -> Outcome {
            let doubled: Arc<Mutex<Vec<i64>>> = Arc::default();
            let sink = doubled.clone();
            let mut counter = fixture(&c);
            let id = counter.add_listener(move |value| fixture(&sink).push(value * 2));
            counter.set_value(5);

            expect(fixture(&n).clone()).to_equal(vec![5])?;
            expect(fixture(&doubled).clone()).to_equal(vec![10])?;

            expect(counter.remove_listener(id)).to_be(true)?;
            counter.reset();
            expect(fixture(&doubled).clone()).to_equal(vec![10])?;
            expect(fixture(&n).clone()).to_equal(vec![5, 0])?;
            Ok(())
        });
    });
}

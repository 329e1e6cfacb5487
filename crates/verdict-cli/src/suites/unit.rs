//! Pure helper functions

use super::Outcome;
use crate::demo::{arrays, math, strings};
use serde_json::json;
use verdict_runtime::prelude::*;

pub(super) fn register(runner: &mut TestRunner) {
    runner.describe("Math Utils", |s| {
        s.it("should add two numbers correctly", || -> Outcome {
            expect(math::add(2.0, 3.0)).to_be(5)?;
            expect(math::add(-1.0, 1.0)).to_be(0)?;
            expect(math::add(0.0, 0.0)).to_be(0)?;
            Ok(())
        });

        s.it("should subtract two numbers correctly", || -> Outcome {
            expect(math::subtract(5.0, 3.0)).to_be(2)?;
            expect(math::subtract(0.0, 5.0)).to_be(-5)?;
            Ok(())
        });

        s.it("should multiply two numbers correctly", || -> Outcome {
            expect(math::multiply(3.0, 4.0)).to_be(12)?;
            expect(math::multiply(-2.0, 3.0)).to_be(-6)?;
            expect(math::multiply(0.0, 10.0)).to_be(0)?;
            Ok(())
        });

        s.it("should divide two numbers correctly", || -> Outcome {
            expect(math::divide(10.0, 2.0).or_raise()?).to_be(5)?;
            expect(math::divide(7.0, 2.0).or_raise()?).to_be(3.5)?;
            Ok(())
        });

        s.it("should throw error when dividing by zero", || {
            expect(thunk(|| math::divide(5.0, 0.0).or_raise())).to_throw_matching("Division by zero")
        });

        s.it("should calculate factorial correctly", || -> Outcome {
            expect(math::factorial(0).or_raise()?).to_be(1)?;
            expect(math::factorial(1).or_raise()?).to_be(1)?;
            expect(math::factorial(5).or_raise()?).to_be(120)?;
            Ok(())
        });

        s.it("should throw error for negative factorial", || {
            expect(thunk(|| math::factorial(-1).or_raise()))
                .to_throw_matching("Factorial of negative number")
        });
    });

    runner.describe("String Utils", |s| {
        s.it("should reverse strings correctly", || -> Outcome {
            expect(strings::reverse("hello")).to_be("olleh")?;
            expect(strings::reverse("")).to_be("")?;
            expect(strings::reverse("a")).to_be("a")?;
            Ok(())
        });

        s.it("should capitalize strings correctly", || -> Outcome {
            expect(strings::capitalize("hello")).to_be("Hello")?;
            expect(strings::capitalize("HELLO")).to_be("HELLO")?;
            expect(strings::capitalize("")).to_be("")?;
            Ok(())
        });

        s.it("should detect palindromes correctly", || -> Outcome {
            expect(strings::is_palindrome("racecar")).to_be(true)?;
            expect(strings::is_palindrome("A man a plan a canal Panama")).to_be(true)?;
            expect(strings::is_palindrome("hello")).to_be(false)?;
            Ok(())
        });

        s.it("should count words correctly", || -> Outcome {
            expect(strings::word_count("hello world")).to_be(2)?;
            expect(strings::word_count("  spaced   out  ")).to_be(2)?;
            expect(strings::word_count("")).to_be(0)?;
            Ok(())
        });
    });

    runner.describe("Array Utils", |s| {
        s.it("should remove duplicates", || -> Outcome {
            expect(arrays::unique(&[1, 2, 2, 3])).to_equal(vec![1, 2, 3])?;
            expect(arrays::unique(&["a", "b", "a"])).to_equal(vec!["a", "b"])?;
            Ok(())
        });

        s.it("should flatten nested arrays", || {
            let nested = Value::from(json!([1, [2, 3], [4, [5]]]));
            expect(arrays::flatten(&nested)).to_equal(json!([1, 2, 3, 4, 5]))
        });

        s.it("should chunk arrays correctly", || -> Outcome {
            let chunks = arrays::chunk(&[1, 2, 3, 4, 5], 2).or_raise()?;
            expect(chunks).to_equal(json!([[1, 2], [3, 4], [5]]))?;
            Ok(())
        });

        s.it("should find maximum value", || -> Outcome {
            expect(arrays::find_max(&[1.0, 5.0, 3.0, 2.0]).or_raise()?).to_be(5)?;
            expect(thunk(|| arrays::find_max(&[]).or_raise())).to_throw_matching("Array is empty")?;
            Ok(())
        });
    });
}

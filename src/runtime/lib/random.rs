use std::{cell::RefCell, rc::Rc};

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::types::Type;
use super::super::{Module, Value};


/// Random.float, Random.integer and Random.seed. All functions share one generator.
pub fn module() -> Module {
	let mut module = Module::new("Random");
	let rng = Rc::new(RefCell::new(ChaCha8Rng::from_entropy()));

	let generator = rng.clone();
	module.add_function(
		"float",
		2,
		Type::Number,
		move |_, task| {
			let args = task.args(2);
			let value = uniform_float(&mut generator.borrow_mut(), args[0].as_number(), args[1].as_number());
			task.push(Value::Number(value));
		},
	);

	let generator = rng.clone();
	module.add_function(
		"float",
		1,
		Type::Number,
		move |_, task| {
			let max = task.pop().as_number();
			let value = uniform_float(&mut generator.borrow_mut(), 0.0, max);
			task.push(Value::Number(value));
		},
	);

	let generator = rng.clone();
	module.add_function(
		"integer",
		2,
		Type::Integer,
		move |_, task| {
			let args = task.args(2);
			let value = uniform_int(&mut generator.borrow_mut(), args[0].as_int(), args[1].as_int());
			task.push(Value::Int(value));
		},
	);

	let generator = rng.clone();
	module.add_function(
		"integer",
		1,
		Type::Integer,
		move |_, task| {
			let max = task.pop().as_int();
			let value = uniform_int(&mut generator.borrow_mut(), 0, max);
			task.push(Value::Int(value));
		},
	);

	module.add_function(
		"seed",
		1,
		Type::Void,
		move |_, task| {
			let seed = task.pop().as_int();
			*rng.borrow_mut() = ChaCha8Rng::seed_from_u64(seed as u64);
		},
	);

	module
}


/// Uniform in [low, high). An empty range produces the lower bound.
fn uniform_float(rng: &mut ChaCha8Rng, low: f64, high: f64) -> f64 {
	if low < high {
		rng.gen_range(low .. high)
	} else {
		low
	}
}


/// Uniform in [low, high). An empty range produces the lower bound.
fn uniform_int(rng: &mut ChaCha8Rng, low: i64, high: i64) -> i64 {
	if low < high {
		rng.gen_range(low .. high)
	} else {
		low
	}
}

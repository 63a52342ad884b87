mod io;
mod random;
mod reflection;
mod string;
mod system;

use super::VmBuilder;


/// Register all standard library modules.
pub fn register(builder: VmBuilder) -> VmBuilder {
	builder
		.register(system::module())
		.register(io::module())
		.register(random::module())
		.register(string::module())
		.register(reflection::module())
}

use std::{
	io,
	fs::{self, File},
	path::{Path, PathBuf},
};


/// Run a test for every wisp script under the given directory, relative to the crate
/// root. Subdirectories are visited recursively, in name order.
pub fn test_dir<P, F>(path: P, mut test: F) -> io::Result<()>
where
	P: AsRef<Path>,
	F: FnMut(&Path, File) -> io::Result<()>,
{
	let mut dir = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
	dir.push(path);

	fn visit<F>(dir: &Path, test: &mut F) -> io::Result<()>
	where
		F: FnMut(&Path, File) -> io::Result<()>,
	{
		let mut paths = fs::read_dir(dir)?
			.map(|entry| entry.map(|entry| entry.path()))
			.collect::<io::Result<Vec<_>>>()?;
		paths.sort();

		for path in paths {
			if path.is_dir() {
				visit(&path, test)?;
			} else if path.extension().map_or(false, |ext| ext == "wisp") {
				let file = File::open(&path)?;
				test(&path, file)?;
			}
		}

		Ok(())
	}

	visit(&dir, &mut test)
}

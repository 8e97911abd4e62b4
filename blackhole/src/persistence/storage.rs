//! Places to read and write named byte streams.
use std::{
    cell::RefCell,
    collections::HashMap,
    fs::File,
    io::{self, BufReader, BufWriter, Cursor, Write},
    path::{Path, PathBuf},
    rc::Rc,
};

/// Source and destination of saved games. Names are interpreted by the implementation.
pub trait Storage {
    /// Stream returned by [`open_read`][Storage::open_read].
    type Reader: io::Read;
    /// Stream returned by [`open_write`][Storage::open_write].
    type Writer: io::Write;

    /// Open the named entry for reading. Missing entries fail with
    /// [`io::ErrorKind::NotFound`].
    fn open_read(&self, name: &str) -> io::Result<Self::Reader>;

    /// Open the named entry for writing, replacing any previous content.
    fn open_write(&self, name: &str) -> io::Result<Self::Writer>;
}

/// Storage backed by files in a directory. Absolute names ignore the directory.
#[derive(Debug, Clone, Default, Eq, PartialEq)]
pub struct FileStorage {
    /// Directory relative names are resolved against. Empty means the working directory.
    root: PathBuf,
}

impl FileStorage {
    /// Create a storage rooted at the given directory.
    pub fn new<P: Into<PathBuf>>(root: P) -> Self {
        Self { root: root.into() }
    }

    /// Get the directory relative names are resolved against.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Get the path the given name resolves to.
    pub fn path(&self, name: &str) -> PathBuf {
        self.root.join(name)
    }
}

impl Storage for FileStorage {
    type Reader = BufReader<File>;
    type Writer = BufWriter<File>;

    fn open_read(&self, name: &str) -> io::Result<Self::Reader> {
        File::open(self.path(name)).map(BufReader::new)
    }

    fn open_write(&self, name: &str) -> io::Result<Self::Writer> {
        File::create(self.path(name)).map(BufWriter::new)
    }
}

/// In-memory storage. Clones share the same entries.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    entries: Rc<RefCell<HashMap<String, Vec<u8>>>>,
}

impl MemoryStorage {
    /// Create an empty storage.
    pub fn new() -> Self {
        Self::default()
    }

    /// Get a copy of the named entry's bytes.
    pub fn get(&self, name: &str) -> Option<Vec<u8>> {
        self.entries.borrow().get(name).cloned()
    }

    /// Replace the named entry's bytes.
    pub fn insert<B: Into<Vec<u8>>>(&self, name: &str, bytes: B) {
        self.entries.borrow_mut().insert(name.to_owned(), bytes.into());
    }

    /// Remove the named entry. Returns true if it existed.
    pub fn remove(&self, name: &str) -> bool {
        self.entries.borrow_mut().remove(name).is_some()
    }
}

impl Storage for MemoryStorage {
    type Reader = Cursor<Vec<u8>>;
    type Writer = MemoryWriter;

    fn open_read(&self, name: &str) -> io::Result<Self::Reader> {
        self.get(name).map(Cursor::new).ok_or_else(|| {
            io::Error::new(io::ErrorKind::NotFound, format!("no entry named {:?}", name))
        })
    }

    fn open_write(&self, name: &str) -> io::Result<Self::Writer> {
        Ok(MemoryWriter {
            name: name.to_owned(),
            buf: Vec::new(),
            storage: self.clone(),
        })
    }
}

/// Writer for a [`MemoryStorage`] entry. Written bytes replace the entry only on flush;
/// a writer dropped without flushing leaves the previous content in place.
#[derive(Debug)]
pub struct MemoryWriter {
    name: String,
    buf: Vec<u8>,
    storage: MemoryStorage,
}

impl Write for MemoryWriter {
    fn write(&mut self, data: &[u8]) -> io::Result<usize> {
        self.buf.extend_from_slice(data);
        Ok(data.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        self.storage.insert(&self.name, self.buf.clone());
        Ok(())
    }
}

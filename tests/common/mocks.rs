//! Mock of a file-like resource, for injecting I/O failures.
use mockall::mock;

use std::io::{self, Read, Write};

mock! {
    pub Resource {}
    impl Read for Resource {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize>;
    }
    impl Write for Resource {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize>;
        fn flush(&mut self) -> io::Result<()>;
    }
}

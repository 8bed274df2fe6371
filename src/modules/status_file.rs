//! Read-to-EOF view of the status block.
//!
//! Opening the file is a request cycle: the first read renders one snapshot
//! and later reads page through it, then report end of file until
//! [`StatusFile::rewind`] starts a new cycle.

use std::io::{self, Read};

use super::engine::Engine;

pub struct StatusFile<'a> {
    engine: &'a Engine,
    page: Option<Vec<u8>>,
    position: usize,
}

impl<'a> StatusFile<'a> {
    pub fn open(engine: &'a Engine) -> Self {
        StatusFile {
            engine,
            page: None,
            position: 0,
        }
    }

    pub fn rewind(&mut self) {
        self.page = None;
        self.position = 0;
    }
}

impl Read for StatusFile<'_> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let engine = self.engine;
        let page = self.page.get_or_insert_with(|| engine.status().into_bytes());
        let remaining = &page[self.position..];
        let count = remaining.len().min(buf.len());
        buf[..count].copy_from_slice(&remaining[..count]);
        self.position += count;
        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modules::engine::ElevatorControl;
    use crate::utilities::config::{ElevatorSettings, TimingSettings};

    #[test]
    fn one_snapshot_per_cycle() {
        let engine = Engine::new(ElevatorSettings::default(), TimingSettings::default());
        let mut file = StatusFile::open(&engine);

        let mut text = String::new();
        file.read_to_string(&mut text).unwrap();
        assert_eq!(text, "Elevator state: OFFLINE\n");

        let mut again = String::new();
        file.read_to_string(&mut again).unwrap();
        assert!(again.is_empty());

        file.rewind();
        let mut fresh = String::new();
        file.read_to_string(&mut fresh).unwrap();
        assert_eq!(fresh, text);
    }

    #[test]
    fn small_buffers_page_through_one_snapshot() {
        let engine = Engine::new(ElevatorSettings::default(), TimingSettings::default());
        engine.start_elevator().unwrap();
        let mut file = StatusFile::open(&engine);

        let mut collected = Vec::new();
        let mut chunk = [0u8; 16];
        loop {
            let count = file.read(&mut chunk).unwrap();
            if count == 0 {
                break;
            }
            collected.extend_from_slice(&chunk[..count]);
        }
        let text = String::from_utf8(collected).unwrap();
        assert!(text.starts_with("Elevator state: "));
        assert!(text.ends_with("[ ] Floor 1: 0\n") || text.ends_with("[*] Floor 1: 0\n"));
        assert_eq!(text.lines().filter(|line| line.contains("Floor")).count(), 10);

        engine.stop_elevator().unwrap();
    }
}

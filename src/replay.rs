use std::fs::File;
use std::io::{BufReader, ErrorKind, Read, Write};
use std::path::Path;

use anyhow::{bail, Context, Result};
use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};

use crate::game::FrameInput;

const MAGIC: &[u8; 4] = b"SNKR";
const VERSION: u8 = 1;

const FLAG_LEFT: u8 = 1 << 0;
const FLAG_RIGHT: u8 = 1 << 1;

/// One recorded frame: the measured delta time and the steering input.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct FrameRecord {
    pub dt: f64,
    pub input: FrameInput,
}

impl FrameRecord {
    fn to_bytes<W: Write>(&self, writer: &mut W) -> Result<(), std::io::Error> {
        let mut flags = 0;
        if self.input.turn_left {
            flags |= FLAG_LEFT;
        }
        if self.input.turn_right {
            flags |= FLAG_RIGHT;
        }

        writer.write_f64::<LittleEndian>(self.dt)?;
        writer.write_u8(flags)?;
        Ok(())
    }

    fn from_bytes<R: Read>(reader: &mut R) -> Result<Self, std::io::Error> {
        let dt = reader.read_f64::<LittleEndian>()?;
        let flags = reader.read_u8()?;

        Ok(Self {
            dt,
            input: FrameInput {
                turn_left: flags & FLAG_LEFT != 0,
                turn_right: flags & FLAG_RIGHT != 0,
            },
        })
    }
}

/// Collects frames in memory until the run ends.
#[derive(Debug)]
pub struct Recorder {
    seed: u64,
    frames: Vec<FrameRecord>,
}

impl Recorder {
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            frames: Vec::new(),
        }
    }

    pub fn push(&mut self, dt: f64, input: FrameInput) {
        self.frames.push(FrameRecord { dt, input });
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn write_to<W: Write>(&self, writer: &mut W) -> Result<()> {
        writer.write_all(MAGIC)?;
        writer.write_u8(VERSION)?;
        writer.write_u64::<LittleEndian>(self.seed)?;
        for frame in &self.frames {
            frame.to_bytes(writer)?;
        }
        Ok(())
    }

    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let mut bytes = Vec::with_capacity(13 + self.frames.len() * 9);
        self.write_to(&mut bytes)?;
        std::fs::write(path, bytes)
            .with_context(|| format!("unable to write replay {}", path.display()))?;
        Ok(())
    }
}

/// A recorded run, played back frame by frame.
#[derive(Debug)]
pub struct Replay {
    seed: u64,
    frames: std::vec::IntoIter<FrameRecord>,
}

impl Replay {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path)
            .with_context(|| format!("unable to open replay {}", path.display()))?;
        Self::read_from(&mut BufReader::new(file))
            .with_context(|| format!("invalid replay {}", path.display()))
    }

    pub fn read_from<R: Read>(reader: &mut R) -> Result<Self> {
        let mut magic = [0; 4];
        reader.read_exact(&mut magic)?;
        if &magic != MAGIC {
            bail!("not a replay file");
        }

        let version = reader.read_u8()?;
        if version != VERSION {
            bail!("unsupported replay version {}", version);
        }

        let seed = reader.read_u64::<LittleEndian>()?;

        let mut frames = Vec::new();
        loop {
            match FrameRecord::from_bytes(reader) {
                Ok(frame) => frames.push(frame),
                // A truncated tail, e.g. from a crash mid-write, ends the replay.
                Err(e) if e.kind() == ErrorKind::UnexpectedEof => break,
                Err(e) => return Err(e.into()),
            }
        }

        tracing::debug!(seed, frames = frames.len(), "replay loaded");

        Ok(Self {
            seed,
            frames: frames.into_iter(),
        })
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn remaining(&self) -> usize {
        self.frames.len()
    }
}

impl Iterator for Replay {
    type Item = FrameRecord;

    fn next(&mut self) -> Option<Self::Item> {
        self.frames.next()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GameConfig;
    use crate::game::Game;
    use std::io::Cursor;

    fn recorded() -> Recorder {
        let mut recorder = Recorder::new(42);
        for i in 0..500 {
            let input = FrameInput {
                turn_left: i % 7 == 0,
                turn_right: i % 11 == 0,
            };
            recorder.push(16.0 + (i % 3) as f64 * 0.5, input);
        }
        recorder
    }

    #[test]
    fn replay_reproduces_the_run() {
        let recorder = recorded();
        let mut bytes = Vec::new();
        recorder.write_to(&mut bytes).unwrap();

        let replay = Replay::read_from(&mut Cursor::new(bytes)).unwrap();
        assert_eq!(replay.seed(), 42);
        assert_eq!(replay.remaining(), recorder.len());

        let config = GameConfig {
            seed: 42,
            ..GameConfig::default()
        };
        let mut live = Game::new(&config);
        let mut replayed = Game::new(&config);

        for (expected, frame) in recorder.frames.iter().zip(replay) {
            assert_eq!(*expected, frame);
            live.update(expected.dt, expected.input);
            replayed.update(frame.dt, frame.input);
        }

        assert_eq!(live.agent().position, replayed.agent().position);
        assert_eq!(live.score(), replayed.score());
        assert_eq!(live.food(), replayed.food());
    }

    #[test]
    fn truncated_tail_is_dropped() {
        let mut bytes = Vec::new();
        recorded().write_to(&mut bytes).unwrap();
        bytes.truncate(bytes.len() - 4);

        let replay = Replay::read_from(&mut Cursor::new(bytes)).unwrap();
        assert_eq!(replay.remaining(), 499);
    }

    #[test]
    fn rejects_foreign_files() {
        let err = Replay::read_from(&mut Cursor::new(b"PNG\0\x01".to_vec()));
        assert!(err.is_err());

        let mut bytes = Vec::new();
        Recorder::new(1).write_to(&mut bytes).unwrap();
        bytes[4] = 9;
        assert!(Replay::read_from(&mut Cursor::new(bytes)).is_err());
    }
}

//! The saved game document.
//!
//! ```json
//! {
//!   "format": "black-hole",
//!   "version": 1,
//!   "size": 5,
//!   "current": "second",
//!   "terminal": false,
//!   "winner": null,
//!   "focus": { "first": [2, 2], "second": null },
//!   "cells": [".....", ".....", "..r..", ".....", "....."]
//! }
//! ```
//!
//! `cells` lists the rows from top to bottom, one character per cell: `.` empty, `r`
//! first player, `b` second player, `#` black hole.
use std::io::{Read, Write};

use serde::{Deserialize, Serialize};

use crate::{
    board::{Board, Cell, Coordinate, TableSize},
    game::{Player, Session, Status},
    persistence::{GameDataError, MalformedReason},
};

/// Value of the `format` field.
pub const FORMAT_TAG: &str = "black-hole";

/// Current value of the `version` field.
pub const FORMAT_VERSION: u32 = 1;

#[derive(Debug, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
struct SessionDocument {
    format: String,
    version: u32,
    size: usize,
    current: Option<Player>,
    terminal: bool,
    winner: Option<Player>,
    focus: FocusDocument,
    cells: Vec<String>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
struct FocusDocument {
    first: Option<Coordinate>,
    second: Option<Coordinate>,
}

impl SessionDocument {
    fn from_session(session: &Session) -> Self {
        let status = session.status();
        Self {
            format: FORMAT_TAG.to_owned(),
            version: FORMAT_VERSION,
            size: session.size().len(),
            current: status.current(),
            terminal: status.is_over(),
            winner: status.winner(),
            focus: FocusDocument {
                first: session.focus(Player::First),
                second: session.focus(Player::Second),
            },
            cells: session
                .board()
                .rows()
                .map(|row| row.map(Cell::token).collect())
                .collect(),
        }
    }

    fn into_session(self) -> Result<Session, MalformedReason> {
        if self.format != FORMAT_TAG {
            return Err(MalformedReason::WrongFormat(self.format));
        }
        if self.version != FORMAT_VERSION {
            return Err(MalformedReason::UnsupportedVersion(self.version));
        }
        let size = TableSize::from_len(self.size)
            .ok_or(MalformedReason::UnsupportedSize(self.size))?;
        let status = match (self.terminal, self.current, self.winner) {
            (false, Some(current), None) => Status::Active { current },
            (true, None, Some(winner)) => Status::Over { winner },
            (false, None, _) => {
                return Err(MalformedReason::InconsistentStatus(
                    "running game without a current player",
                ))
            }
            (false, Some(_), Some(_)) => {
                return Err(MalformedReason::InconsistentStatus(
                    "running game with a winner",
                ))
            }
            (true, _, None) => {
                return Err(MalformedReason::InconsistentStatus(
                    "finished game without a winner",
                ))
            }
            (true, Some(_), Some(_)) => {
                return Err(MalformedReason::InconsistentStatus(
                    "finished game with a current player",
                ))
            }
        };
        let board = parse_cells(size, &self.cells)?;
        Session::from_parts(board, status, [self.focus.first, self.focus.second])
    }
}

/// Parse the row strings of a document into a board.
fn parse_cells(size: TableSize, rows: &[String]) -> Result<Board, MalformedReason> {
    let len = size.len();
    if rows.len() != len {
        return Err(MalformedReason::RowCount {
            expected: len,
            found: rows.len(),
        });
    }
    let mut cells = Vec::with_capacity(size.total_size());
    for (row, text) in rows.iter().enumerate() {
        let found = text.chars().count();
        if found != len {
            return Err(MalformedReason::RowLength {
                row,
                expected: len,
                found,
            });
        }
        for (col, token) in text.chars().enumerate() {
            let cell = Cell::from_token(token).ok_or(MalformedReason::UnknownCell {
                at: Coordinate::new(row, col),
                token,
            })?;
            cells.push(cell);
        }
    }
    // Row count and lengths were checked above.
    Board::from_cells(size, cells).ok_or(MalformedReason::RowCount {
        expected: len,
        found: rows.len(),
    })
}

/// Serialize a session to `writer`. The document is built in memory first, so an I/O
/// failure is the only way to leave a partial write behind.
pub fn write_session<W: Write>(session: &Session, mut writer: W) -> Result<(), GameDataError> {
    let doc = SessionDocument::from_session(session);
    let mut bytes = serde_json::to_vec_pretty(&doc).map_err(std::io::Error::from)?;
    bytes.push(b'\n');
    writer.write_all(&bytes)?;
    writer.flush()?;
    Ok(())
}

/// Read and validate a session from `reader`.
///
/// Fails with [`GameDataError::Io`] if the reader fails and with
/// [`GameDataError::Malformed`] if the bytes are not a valid saved session.
pub fn read_session<R: Read>(mut reader: R) -> Result<Session, GameDataError> {
    let mut bytes = Vec::new();
    reader.read_to_end(&mut bytes)?;
    let doc: SessionDocument = serde_json::from_slice(&bytes).map_err(|err| {
        if err.is_io() {
            GameDataError::Io(err.into())
        } else {
            MalformedReason::Syntax(err.to_string()).into()
        }
    })?;
    Ok(doc.into_session()?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    use crate::{board::Direction, game::Move};

    fn sample_session() -> Session {
        let mut session = Session::new(TableSize::Seven);
        for &mv in &[
            Move::Place {
                at: Coordinate::new(3, 3),
            },
            Move::Place {
                at: Coordinate::new(0, 6),
            },
            Move::Shift {
                direction: Direction::Up,
            },
        ] {
            session.apply(mv).unwrap();
        }
        session
    }

    fn save(session: &Session) -> String {
        let mut buf = Vec::new();
        write_session(session, &mut buf).unwrap();
        String::from_utf8(buf).unwrap()
    }

    /// Save the sample session, let `edit` change the document, and return the text.
    fn edited(edit: impl FnOnce(&mut serde_json::Value)) -> String {
        let mut value: serde_json::Value =
            serde_json::from_str(&save(&sample_session())).unwrap();
        edit(&mut value);
        value.to_string()
    }

    fn reason(text: &str) -> MalformedReason {
        match read_session(text.as_bytes()) {
            Err(GameDataError::Malformed(err)) => err.into_reason(),
            other => panic!("expected malformed data, got {:?}", other),
        }
    }

    #[test]
    fn document_layout() {
        let text = save(&sample_session());
        let value: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(value["format"], "black-hole");
        assert_eq!(value["size"], 7);
        assert_eq!(value["current"], "second");
        assert_eq!(value["terminal"], false);
        assert_eq!(value["winner"], serde_json::Value::Null);
        assert_eq!(value["focus"]["first"], serde_json::json!([3, 3]));
        assert_eq!(value["cells"][2], "...#...");
        assert_eq!(value["cells"][3], "...r...");
        assert_eq!(value["cells"][0], "......b");
    }

    #[test]
    fn read_back_written_session() {
        let session = sample_session();
        let loaded = read_session(save(&session).as_bytes()).unwrap();
        assert_eq!(loaded, session);
    }

    #[test]
    fn truncated_document_is_malformed() {
        let text = save(&sample_session());
        let cut = &text[..text.len() / 2];
        assert!(matches!(reason(cut), MalformedReason::Syntax(_)));
        assert!(matches!(reason(""), MalformedReason::Syntax(_)));
    }

    #[test]
    fn bad_grids_are_malformed() {
        assert_eq!(
            reason(&edited(|v| v["cells"][3] = json!("...r.."))),
            MalformedReason::RowLength {
                row: 3,
                expected: 7,
                found: 6
            }
        );
        assert_eq!(
            reason(&edited(|v| v["cells"][3] = json!("...r..x"))),
            MalformedReason::UnknownCell {
                at: Coordinate::new(3, 6),
                token: 'x'
            }
        );
        assert_eq!(
            reason(&edited(|v| v["size"] = json!(5))),
            MalformedReason::RowCount {
                expected: 5,
                found: 7
            }
        );
        assert_eq!(
            reason(&edited(|v| v["size"] = json!(6))),
            MalformedReason::UnsupportedSize(6)
        );
    }

    #[test]
    fn bad_headers_are_malformed() {
        assert_eq!(
            reason(&edited(|v| v["format"] = json!("sudoku"))),
            MalformedReason::WrongFormat("sudoku".to_owned())
        );
        assert_eq!(
            reason(&edited(|v| v["version"] = json!(2))),
            MalformedReason::UnsupportedVersion(2)
        );
        assert!(matches!(
            reason(&edited(|v| v["current"] = json!("third"))),
            MalformedReason::Syntax(_)
        ));
        assert!(matches!(
            reason(&edited(|v| v["extra"] = json!(true))),
            MalformedReason::Syntax(_)
        ));
    }

    #[test]
    fn inconsistent_status_is_malformed() {
        assert!(matches!(
            reason(&edited(|v| v["terminal"] = json!(true))),
            MalformedReason::InconsistentStatus(_)
        ));
        assert!(matches!(
            reason(&edited(|v| v["winner"] = json!("first"))),
            MalformedReason::InconsistentStatus(_)
        ));
        assert!(matches!(
            reason(&edited(|v| v["current"] = json!(null))),
            MalformedReason::InconsistentStatus(_)
        ));
    }

    #[test]
    fn turn_must_follow_from_the_board() {
        // Three cells are filled in the sample, four after the edit.
        assert_eq!(
            reason(&edited(|v| v["current"] = json!("first"))),
            MalformedReason::InconsistentStatus(
                "current player does not match the number of moves"
            )
        );
        assert_eq!(
            reason(&edited(|v| v["cells"][6] = json!("r......"))),
            MalformedReason::InconsistentStatus(
                "current player does not match the number of moves"
            )
        );
    }

    fn finished(winner: &str, cells: serde_json::Value) -> String {
        edited(|v| {
            v["terminal"] = json!(true);
            v["current"] = json!(null);
            v["winner"] = json!(winner);
            v["focus"] = json!({ "first": null, "second": null });
            v["cells"] = cells;
        })
    }

    #[test]
    fn finished_game_must_match_the_board() {
        let empty = ".......";
        assert_eq!(
            reason(&finished("second", json!(vec![empty; 7]))),
            MalformedReason::InconsistentStatus("finished game with empty cells")
        );

        // First owns 25 of the 49 cells.
        let (even, odd) = ("rbrbrbr", "brbrbrb");
        let checkerboard = json!([even, odd, even, odd, even, odd, even]);
        assert_eq!(
            reason(&finished("second", checkerboard.clone())),
            MalformedReason::InconsistentStatus("winner does not match the board")
        );
        let session = read_session(finished("first", checkerboard).as_bytes()).unwrap();
        assert_eq!(session.winner(), Some(Player::First));
        assert_eq!(session.current(), None);
    }

    #[test]
    fn focus_must_point_at_own_mark() {
        assert_eq!(
            reason(&edited(|v| v["focus"]["second"] = json!([3, 3]))),
            MalformedReason::InvalidFocus {
                player: Player::Second,
                at: Coordinate::new(3, 3)
            }
        );
    }

    #[test]
    fn running_game_on_full_board_is_malformed() {
        let full = "rbrbrbr";
        assert_eq!(
            reason(&edited(|v| {
                v["cells"] = json!([full, full, full, full, full, full, full]);
                v["focus"] = json!({ "first": null, "second": null });
            })),
            MalformedReason::Stalled(Player::Second)
        );
    }

    #[test]
    fn failing_reader_is_io() {
        struct Broken;
        impl Read for Broken {
            fn read(&mut self, _: &mut [u8]) -> std::io::Result<usize> {
                Err(std::io::Error::new(std::io::ErrorKind::Other, "disk on fire"))
            }
        }
        assert!(matches!(read_session(Broken), Err(GameDataError::Io(_))));
    }

    #[test]
    fn failing_writer_is_io() {
        struct Full;
        impl Write for Full {
            fn write(&mut self, _: &[u8]) -> std::io::Result<usize> {
                Err(std::io::Error::new(std::io::ErrorKind::Other, "disk full"))
            }
            fn flush(&mut self) -> std::io::Result<()> {
                Ok(())
            }
        }
        let err = write_session(&sample_session(), Full).unwrap_err();
        assert!(matches!(err, GameDataError::Io(_)));
        assert!(!err.is_malformed());
    }
}

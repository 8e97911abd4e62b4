use std::{
    fmt,
    io::{self, BufRead, Write},
};

use clap::{App, Arg, ArgMatches};
use once_cell::sync::Lazy;
use rand::Rng;
use regex::Regex;
use tracing::debug;
use tracing_subscriber::EnvFilter;

use blackhole::{
    persistence::FileStorage, Cell, Coordinate, Direction, GameDataError, GameEvent, GameModel,
    GameObserver, Move, Player, TableSize,
};

fn main() -> io::Result<()> {
    let matches = App::new("Black Hole")
        .version("1.0")
        .author("Zachary Stewart <zachary@zstewart.com>")
        .about("Two-player Black Hole on the command line.")
        .arg(
            Arg::with_name("size")
                .short("s")
                .long("size")
                .value_name("SIZE")
                .help("side length of the board")
                .takes_value(true)
                .possible_values(&["5", "7", "9"])
                .default_value("5"),
        )
        .arg(
            Arg::with_name("opponent")
                .short("o")
                .long("opponent")
                .value_name("OPPONENT")
                .help("who plays blue")
                .takes_value(true)
                .possible_values(&["human", "bot", "computer"])
                .case_insensitive(true)
                .default_value("human"),
        )
        .arg(
            Arg::with_name("suspend_file")
                .long("suspend-file")
                .value_name("PATH")
                .help("resume the game from PATH if it exists and save it there on exit")
                .takes_value(true),
        )
        .get_matches();

    init_logging();

    let size = table_size(&matches);
    let bot = match matches.value_of("opponent") {
        Some(opponent) if !opponent.eq_ignore_ascii_case("human") => Some(Player::Second),
        _ => None,
    };
    let suspend_file = matches.value_of("suspend_file");
    let storage = FileStorage::default();

    let mut model = GameModel::new(size);
    model.subscribe(ChangePrinter);
    if let Some(path) = suspend_file {
        match model.load_from(&storage, path) {
            Ok(()) => println!("Resumed the game saved in {}.", path),
            Err(err) if err.is_not_found() => debug!(path = %path, "no suspended game to resume"),
            Err(err) => report_load_error(path, &err),
        }
    }

    let stdin = std::io::stdin();
    let mut input = InputReader::new(stdin.lock());
    let mut rng = rand::thread_rng();
    play(&mut model, bot, &mut input, &mut rng)?;

    if let Some(path) = suspend_file {
        if let Err(err) = model.save_to(&storage, path) {
            println!("Could not suspend the game to {}: {}", path, err);
        }
    }
    Ok(())
}

/// Install the log subscriber. `RUST_LOG` overrides the default `warn` level.
fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

/// Read the table size from the arguments.
fn table_size(matches: &ArgMatches) -> TableSize {
    matches
        .value_of("size")
        .and_then(|size| size.parse().ok())
        .unwrap_or_default()
}

/// A line of input from the player.
enum Command {
    Move(Move),
    New(Option<TableSize>),
    Save(String),
    Load(String),
    Moves,
    Help,
    Quit,
}

/// Run the game loop until the player quits or input ends.
fn play(
    model: &mut GameModel,
    bot: Option<Player>,
    input: &mut InputReader<impl BufRead>,
    rng: &mut impl Rng,
) -> io::Result<()> {
    let storage = FileStorage::default();
    println!("Black Hole. Type help or ? for commands.");
    loop {
        if let (Some(bot), Some(current)) = (bot, model.current_player()) {
            if bot == current {
                if let Some(mv) = model.random_move(rng) {
                    println!("{} plays {}", PlayerName(bot), mv);
                    model.player_clicked(mv);
                    continue;
                }
            }
        }

        println!();
        show_board(model);
        show_status(model);
        println!();

        let cmd = match input.read_input("> ", parse_command)? {
            Some(cmd) => cmd,
            None => return Ok(()),
        };
        match cmd {
            Command::Move(_) if model.is_over() => {
                println!("The game is over. Type new to start another one.");
            }
            Command::Move(mv) => {
                if let Err(reason) = model.check_move(mv) {
                    println!("Illegal move: {}.", reason);
                } else {
                    model.player_clicked(mv);
                }
            }
            Command::New(size) => {
                let size = size.unwrap_or_else(|| model.table_size());
                model.new_game(size);
            }
            Command::Save(path) => match model.save_to(&storage, &path) {
                Ok(()) => println!("Saved to {}.", path),
                Err(err) => println!("Saving failed: {}", err),
            },
            Command::Load(path) => {
                if let Err(err) = model.load_from(&storage, &path) {
                    report_load_error(&path, &err);
                }
            }
            Command::Moves => {
                let moves = model.legal_moves();
                let shifts: Vec<_> = moves
                    .iter()
                    .filter_map(|mv| match mv {
                        Move::Shift { direction } => Some(direction.name()),
                        Move::Place { .. } => None,
                    })
                    .collect();
                println!(
                    "{} empty cells to claim, shifts: {}",
                    moves.len() - shifts.len(),
                    if shifts.is_empty() {
                        "none".to_owned()
                    } else {
                        shifts.join(", ")
                    }
                );
            }
            Command::Quit => return Ok(()),
            Command::Help => {
                println!(
                    "Available Commands:
    place <row>,<col>   claim the empty cell at the given position. \"place\" may be left out.
    up|down|left|right  collapse the empty cell next to your last claim into a black hole.
    new [5|7|9]         start a new game, optionally on a board of a different size.
    save <path>         save the game to a file.
    load <path>         load a game from a file.
    moves               list the moves you can make.
    quit                leave the game.

The game ends when the board is full. Whoever claimed more cells wins."
                );
            }
        }
    }
}

/// Parse one line of input. Prints a message and returns `None` for invalid input.
fn parse_command(line: &str) -> Option<Command> {
    static PLACE: Lazy<Regex> = Lazy::new(|| {
        Regex::new(
            r"^(?xi)(?:(?:place|put|p)\s+)?
        (?P<row>[0-9]+)(?:\s*,\s*|\s+)(?P<col>[0-9]+)$",
        )
        .unwrap()
    });
    static SHIFT: Lazy<Regex> =
        Lazy::new(|| Regex::new(r"^(?i)(?:shift\s+)?(?P<dir>[a-z]+)$").unwrap());
    static NEW: Lazy<Regex> =
        Lazy::new(|| Regex::new(r"^(?i)new(?:\s+(?P<size>\S+))?$").unwrap());
    static FILE: Lazy<Regex> =
        Lazy::new(|| Regex::new(r"^(?i)(?P<cmd>save|load)\s+(?P<path>.+)$").unwrap());

    match line.to_ascii_lowercase().as_str() {
        "?" | "help" | "h" => return Some(Command::Help),
        "quit" | "exit" | "q" => return Some(Command::Quit),
        "moves" | "m" => return Some(Command::Moves),
        _ => {}
    }

    if let Some(captures) = NEW.captures(line) {
        return match captures.name("size") {
            None => Some(Command::New(None)),
            Some(size) => match size.as_str().parse() {
                Ok(size) => Some(Command::New(Some(size))),
                Err(err) => {
                    println!("{}", err);
                    None
                }
            },
        };
    }
    if let Some(captures) = FILE.captures(line) {
        let path = captures.name("path").unwrap().as_str().to_owned();
        return Some(
            if captures.name("cmd").unwrap().as_str().eq_ignore_ascii_case("save") {
                Command::Save(path)
            } else {
                Command::Load(path)
            },
        );
    }
    if let Some(captures) = PLACE.captures(line) {
        let row = captures.name("row").unwrap().as_str();
        let col = captures.name("col").unwrap().as_str();
        return match (row.parse(), col.parse()) {
            (Ok(row), Ok(col)) => Some(Command::Move(Move::Place {
                at: Coordinate::new(row, col),
            })),
            _ => {
                println!("invalid position {},{}", row, col);
                None
            }
        };
    }
    if let Some(captures) = SHIFT.captures(line) {
        let dir = captures.name("dir").unwrap().as_str();
        return match dir.parse::<Direction>() {
            Ok(direction) => Some(Command::Move(Move::Shift { direction })),
            Err(()) => {
                println!("Unknown command \"{}\". Use '?' for help", line);
                None
            }
        };
    }
    println!("Unknown command \"{}\". Use '?' for help", line);
    None
}

/// Report a failed load, separating unreadable files from corrupt ones.
fn report_load_error(path: &str, err: &GameDataError) {
    match err {
        GameDataError::Malformed(err) => {
            println!("The saved game in {} is corrupt ({}).", path, err.reason())
        }
        GameDataError::Io(err) => println!("Could not read {}: {}", path, err),
    }
}

/// Prints changes as the model reports them.
struct ChangePrinter;

impl GameObserver for ChangePrinter {
    fn notify(&mut self, event: &GameEvent) {
        match *event {
            GameEvent::FieldChanged {
                at,
                cell: Cell::Marked(player),
            } => println!("{} claimed {}", PlayerName(player), at),
            GameEvent::FieldChanged { at, .. } => println!("{} collapsed into a black hole", at),
            GameEvent::PlayerChanged(_) => {}
            GameEvent::GameOver { winner } => {
                println!();
                println!("Game over!");
                println!("The winner: {}", PlayerName(winner));
            }
            GameEvent::GameLoaded => println!("New board."),
        }
    }
}

/// Print the board. The focus of the player on turn is shown in brackets.
fn show_board(model: &GameModel) {
    struct ShownCell {
        cell: Cell,
        focused: bool,
    }
    impl fmt::Display for ShownCell {
        fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
            if self.focused {
                f.pad(&format!("[{}]", self.cell.token()))
            } else {
                f.pad(&self.cell.token().to_string())
            }
        }
    }

    let focus = model
        .current_player()
        .and_then(|player| model.focus(player));
    let size = model.table_size();
    print!("   ");
    for i in 0..size.len() {
        print!("{:^4}", i);
    }
    println!();
    for (row, coords) in size.iter_coordinates().enumerate() {
        print!("{:>2} ", row);
        for coord in coords {
            let cell = ShownCell {
                cell: model.cell(coord).unwrap_or_default(),
                focused: focus == Some(coord),
            };
            print!("{:^4}", cell);
        }
        println!();
    }
}

/// Print whose turn it is, the table size and the scores.
fn show_status(model: &GameModel) {
    let turn = match (model.current_player(), model.winner()) {
        (Some(player), _) => format!("{} to move", PlayerName(player)),
        (None, Some(winner)) => format!("{} won", PlayerName(winner)),
        (None, None) => String::new(),
    };
    println!(
        "{} | {} | {} {} - {} {}",
        turn,
        model.table_size(),
        PlayerName(Player::First),
        model.score(Player::First).marks,
        model.score(Player::Second).marks,
        PlayerName(Player::Second),
    );
}

/// Display helper that prints the player's colour and seat.
struct PlayerName(Player);

impl fmt::Display for PlayerName {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.pad(&format!("{} ({})", self.0.colour(), self.0.name()))
    }
}

/// Helper to read input from the player.
struct InputReader<B> {
    read: B,
    buf: String,
}

impl<B> InputReader<B> {
    fn new(read: B) -> Self {
        Self {
            read,
            buf: String::new(),
        }
    }
}

impl<B: BufRead> InputReader<B> {
    /// Repeatedly tries to read input until the input checker returns `Some`. Returns
    /// `None` once the input is exhausted.
    fn read_input<F, T>(&mut self, prompt: &str, mut checker: F) -> io::Result<Option<T>>
    where
        F: FnMut(&str) -> Option<T>,
    {
        loop {
            if !self.read_input_inner(prompt)? {
                return Ok(None);
            }
            let line = self.buf.trim();
            if line.is_empty() {
                continue;
            }
            if let Some(val) = checker(line) {
                return Ok(Some(val));
            }
        }
    }

    /// Helper to print the prompt, clear the string buffer and read a line. Returns false
    /// at the end of input.
    fn read_input_inner(&mut self, prompt: &str) -> io::Result<bool> {
        print!("{} ", prompt);
        io::stdout().flush()?;
        self.buf.clear();
        if self.read.read_line(&mut self.buf)? == 0 {
            println!();
            return Ok(false);
        }
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parsed_move(line: &str) -> Option<Move> {
        match parse_command(line) {
            Some(Command::Move(mv)) => Some(mv),
            _ => None,
        }
    }

    #[test]
    fn parses_places() {
        let expected = Some(Move::Place {
            at: Coordinate::new(2, 3),
        });
        assert_eq!(parsed_move("place 2,3"), expected);
        assert_eq!(parsed_move("P 2 , 3"), expected);
        assert_eq!(parsed_move("2 3"), expected);
    }

    #[test]
    fn parses_shifts() {
        assert_eq!(
            parsed_move("up"),
            Some(Move::Shift {
                direction: Direction::Up
            })
        );
        assert_eq!(
            parsed_move("shift West"),
            Some(Move::Shift {
                direction: Direction::Left
            })
        );
        assert_eq!(parsed_move("sideways"), None);
    }

    #[test]
    fn parses_file_commands_keeping_case() {
        match parse_command("save Games/Mine.stl") {
            Some(Command::Save(path)) => assert_eq!(path, "Games/Mine.stl"),
            _ => panic!("expected save"),
        }
        match parse_command("LOAD a.stl") {
            Some(Command::Load(path)) => assert_eq!(path, "a.stl"),
            _ => panic!("expected load"),
        }
    }

    #[test]
    fn parses_new_games() {
        assert!(matches!(parse_command("new"), Some(Command::New(None))));
        assert!(matches!(
            parse_command("new 9x9"),
            Some(Command::New(Some(TableSize::Nine)))
        ));
        assert!(parse_command("new 6").is_none());
    }

    #[test]
    fn input_reader_skips_blank_lines_and_stops_at_eof() {
        let mut input = InputReader::new(&b"\n  \nquit\n"[..]);
        assert!(matches!(
            input.read_input(">", parse_command).unwrap(),
            Some(Command::Quit)
        ));
        assert!(input.read_input(">", parse_command).unwrap().is_none());
    }
}

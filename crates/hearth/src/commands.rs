//! Command dispatch for named players.
//!
//! Each command word maps to a plain function in a [`CommandTable`].
//! Lookup is by exact, case-sensitive match on the first word of the
//! line; anything not in the table gets `Unknown command '<word>'`.
//!
//! Handlers run inside the world loop with exclusive access to the
//! registry through [`CommandContext`], so a handler that mutates state
//! (like `go`) and then broadcasts always sees its own change.

use std::collections::HashMap;

use hearth_protocol::Command;
use hearth_rooms::{RoomGraph, RoomKey, describe};
use hearth_session::PlayerRegistry;
use hearth_transport::{ConnectionId, Outbox};

use crate::HearthError;
use crate::broadcast::Broadcaster;

/// Lines sent in reply to `help`.
pub const HELP_LINES: [&str; 4] = [
    "Commands:",
    "  say <message>  - Says something out loud, e.g. 'say Hello'",
    "  look           - Examines the surroundings, e.g. 'look'",
    "  go <exit>      - Moves through the exit specified, e.g. 'go outside'",
];

/// Everything a handler may touch while running one command.
///
/// `name` and `room` are the sender's values at dispatch time. A handler
/// that moves the sender updates `room` as well as the registry.
pub struct CommandContext<'a> {
    pub rooms: &'a RoomGraph,
    pub players: &'a mut PlayerRegistry,
    pub out: &'a dyn Outbox,
    pub sender: ConnectionId,
    pub name: String,
    pub room: RoomKey,
}

impl CommandContext<'_> {
    /// Sends one message back to the player who issued the command.
    pub fn reply(&self, msg: &str) {
        self.out.send(self.sender, msg);
    }

    /// A broadcaster over the current registry contents.
    pub fn broadcast(&self) -> Broadcaster<'_> {
        Broadcaster::new(&*self.players, self.out)
    }
}

/// A command handler: receives the context and the text after the
/// command word (already trimmed, possibly empty).
pub type CommandHandler =
    fn(&mut CommandContext<'_>, &str) -> Result<(), HearthError>;

/// Maps command words to handlers.
pub struct CommandTable {
    handlers: HashMap<&'static str, CommandHandler>,
}

impl CommandTable {
    /// An empty table. Every word is unknown.
    pub fn new() -> Self {
        Self {
            handlers: HashMap::new(),
        }
    }

    /// The built-in command set: `help`, `say`, `look` (alias `l`) and
    /// `go`.
    pub fn standard() -> Self {
        let mut table = Self::new();
        table
            .register("help", help)
            .register("say", say)
            .register("look", look)
            .register("l", look)
            .register("go", go);
        table
    }

    /// Adds or replaces the handler for `word`.
    pub fn register(
        &mut self,
        word: &'static str,
        handler: CommandHandler,
    ) -> &mut Self {
        self.handlers.insert(word, handler);
        self
    }

    /// Returns `true` if `word` has a handler.
    pub fn contains(&self, word: &str) -> bool {
        self.handlers.contains_key(word)
    }

    /// Runs the handler for `cmd.word`, or replies with the
    /// unknown-command message.
    pub fn dispatch(
        &self,
        ctx: &mut CommandContext<'_>,
        cmd: &Command,
    ) -> Result<(), HearthError> {
        match self.handlers.get(cmd.word.as_str()) {
            Some(handler) => handler(ctx, &cmd.params),
            None => {
                tracing::trace!(
                    conn_id = %ctx.sender,
                    word = %cmd.word,
                    "unknown command"
                );
                ctx.reply(&format!("Unknown command '{}'", cmd.word));
                Ok(())
            }
        }
    }
}

impl Default for CommandTable {
    fn default() -> Self {
        Self::standard()
    }
}

fn help(ctx: &mut CommandContext<'_>, _params: &str) -> Result<(), HearthError> {
    for line in HELP_LINES {
        ctx.reply(line);
    }
    Ok(())
}

/// Everyone named in the sender's room hears it, the sender included.
/// An empty message is still said.
fn say(ctx: &mut CommandContext<'_>, params: &str) -> Result<(), HearthError> {
    let msg = format!("{} says: {}", ctx.name, params);
    ctx.broadcast().room(&ctx.room, &msg, &[]);
    Ok(())
}

fn look(ctx: &mut CommandContext<'_>, _params: &str) -> Result<(), HearthError> {
    let room = ctx.rooms.lookup(&ctx.room)?;
    ctx.reply(&describe(room));

    let here: Vec<&str> = ctx
        .players
        .named_in_room(&ctx.room)
        .filter_map(|p| p.name())
        .collect();
    ctx.reply(&format!("Players here: {}", here.join(", ")));

    let exits: Vec<&str> = room.exit_names().collect();
    ctx.reply(&format!("Exits are: {}", exits.join(", ")));
    Ok(())
}

/// Exit names are matched lowercased. Departure is announced before the
/// move and arrival after it, so the mover hears neither.
fn go(ctx: &mut CommandContext<'_>, params: &str) -> Result<(), HearthError> {
    let exit = params.to_lowercase();
    let from = ctx.room.clone();
    let Some(target) = ctx.rooms.lookup(&from)?.exit(&exit).cloned() else {
        ctx.reply(&format!("Unknown exit '{exit}'"));
        return Ok(());
    };

    let sender = ctx.sender;
    ctx.broadcast().room(
        &from,
        &format!("{} left via exit '{}'", ctx.name, exit),
        &[sender],
    );

    ctx.players.set_room(sender, target.clone())?;
    ctx.room = target.clone();

    ctx.broadcast().room(
        &target,
        &format!("{} arrived via exit '{}'", ctx.name, exit),
        &[sender],
    );

    let dest = ctx.rooms.lookup(&target)?;
    ctx.reply(&format!("You arrive at '{}'", dest.name));

    tracing::debug!(
        conn_id = %sender,
        from = %from,
        to = %target,
        "player moved"
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use hearth_rooms::Room;

    use super::*;
    use crate::broadcast::testing::RecordingOutbox;

    fn cid(n: u64) -> ConnectionId {
        ConnectionId::new(n)
    }

    fn graph() -> RoomGraph {
        RoomGraph::from_rooms([
            Room::new("tavern", "Tavern", "A cozy tavern.")
                .with_exit("outside", "outside"),
            Room::new("outside", "Outside the tavern", "Cold wind.")
                .with_exit("inside", "tavern"),
        ])
        .unwrap()
    }

    fn registry() -> PlayerRegistry {
        let mut reg = PlayerRegistry::new();
        reg.register(cid(1)).unwrap();
        reg.register(cid(2)).unwrap();
        reg.activate(cid(1), "Alice", RoomKey::from("tavern")).unwrap();
        reg.activate(cid(2), "Bob", RoomKey::from("tavern")).unwrap();
        reg
    }

    fn run(
        table: &CommandTable,
        rooms: &RoomGraph,
        players: &mut PlayerRegistry,
        out: &RecordingOutbox,
        line: &str,
    ) {
        let mut ctx = CommandContext {
            rooms,
            players,
            out,
            sender: cid(1),
            name: "Alice".into(),
            room: RoomKey::from("tavern"),
        };
        table
            .dispatch(&mut ctx, &Command::parse(line))
            .expect("dispatch");
    }

    #[test]
    fn test_standard_table_words() {
        let table = CommandTable::standard();
        for word in ["help", "say", "look", "l", "go"] {
            assert!(table.contains(word), "missing {word}");
        }
        assert!(!table.contains("LOOK"));
    }

    #[test]
    fn test_unknown_command_reply() {
        let rooms = graph();
        let mut players = registry();
        let out = RecordingOutbox::default();
        run(&CommandTable::standard(), &rooms, &mut players, &out, "dance wildly");
        assert_eq!(out.to(cid(1)), vec!["Unknown command 'dance'"]);
        assert!(out.to(cid(2)).is_empty());
    }

    #[test]
    fn test_help_lines() {
        let rooms = graph();
        let mut players = registry();
        let out = RecordingOutbox::default();
        run(&CommandTable::standard(), &rooms, &mut players, &out, "help");
        assert_eq!(out.to(cid(1)), HELP_LINES.to_vec());
    }

    #[test]
    fn test_say_empty_message() {
        let rooms = graph();
        let mut players = registry();
        let out = RecordingOutbox::default();
        run(&CommandTable::standard(), &rooms, &mut players, &out, "say");
        assert_eq!(out.to(cid(1)), vec!["Alice says: "]);
        assert_eq!(out.to(cid(2)), vec!["Alice says: "]);
    }

    #[test]
    fn test_look_alias_matches_look() {
        let rooms = graph();
        let mut players = registry();
        let table = CommandTable::standard();

        let out = RecordingOutbox::default();
        run(&table, &rooms, &mut players, &out, "look");
        let full = out.to(cid(1));

        out.clear();
        run(&table, &rooms, &mut players, &out, "l");
        assert_eq!(out.to(cid(1)), full);
        assert_eq!(
            full,
            vec![
                "Tavern\nA cozy tavern.",
                "Players here: Alice, Bob",
                "Exits are: outside",
            ]
        );
    }

    #[test]
    fn test_go_empty_exit() {
        let rooms = graph();
        let mut players = registry();
        let out = RecordingOutbox::default();
        run(&CommandTable::standard(), &rooms, &mut players, &out, "go");
        assert_eq!(out.to(cid(1)), vec!["Unknown exit ''"]);
        assert_eq!(
            players.get(cid(1)).unwrap().room(),
            Some(&RoomKey::from("tavern"))
        );
    }

    #[test]
    fn test_go_moves_and_announces() {
        let rooms = graph();
        let mut players = registry();
        let out = RecordingOutbox::default();
        run(&CommandTable::standard(), &rooms, &mut players, &out, "go Outside");

        assert_eq!(out.to(cid(1)), vec!["You arrive at 'Outside the tavern'"]);
        assert_eq!(out.to(cid(2)), vec!["Alice left via exit 'outside'"]);
        assert_eq!(
            players.get(cid(1)).unwrap().room(),
            Some(&RoomKey::from("outside"))
        );
    }

    #[test]
    fn test_register_custom_command() {
        fn ping(
            ctx: &mut CommandContext<'_>,
            params: &str,
        ) -> Result<(), HearthError> {
            ctx.reply(&format!("pong {params}"));
            Ok(())
        }

        let rooms = graph();
        let mut players = registry();
        let out = RecordingOutbox::default();
        let mut table = CommandTable::new();
        table.register("ping", ping);
        run(&table, &rooms, &mut players, &out, "ping 7");
        assert_eq!(out.to(cid(1)), vec!["pong 7"]);

        out.clear();
        run(&table, &rooms, &mut players, &out, "look");
        assert_eq!(out.to(cid(1)), vec!["Unknown command 'look'"]);
    }
}

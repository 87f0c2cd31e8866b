use chrono::Local;
use comfy_table::{presets::UTF8_FULL, Cell, Table};
use luxbet_core::{GameConfig, Player};
use luxbet_lottery::{GameSnapshot, ResultFeed};

const GRID_COLUMNS: usize = 5;

pub fn player_card(player: &Player) -> Table {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_header(vec!["Username", "UID", "VIP", "Balance", "Last Login"]);
    table.add_row(vec![
        Cell::new(&player.username),
        Cell::new(&player.uid),
        Cell::new(format!("VIP {}", player.vip_level)),
        Cell::new(player.balance.to_string()),
        Cell::new(&player.last_login),
    ]);
    table
}

pub fn results(feed: ResultFeed<'_>) -> String {
    match feed {
        ResultFeed::Waiting => "Waiting for results...".to_string(),
        ResultFeed::Results(results) => {
            let mut table = Table::new();
            table.load_preset(UTF8_FULL);
            table.set_header(vec!["Period", "Winner", "Settled"]);
            for result in results {
                table.add_row(vec![
                    Cell::new(&result.period),
                    Cell::new(result.winning_number),
                    Cell::new(
                        result
                            .settled_at
                            .with_timezone(&Local)
                            .format("%H:%M:%S")
                            .to_string(),
                    ),
                ]);
            }
            table.to_string()
        }
    }
}

pub fn number_grid(max_number: u8, selected: Option<u8>) -> Table {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL);

    let numbers: Vec<u8> = (1..=max_number).collect();
    for row in numbers.chunks(GRID_COLUMNS) {
        table.add_row(row.iter().map(|&n| {
            if Some(n) == selected {
                Cell::new(format!("[{:>2}]", n))
            } else {
                Cell::new(format!(" {:>2} ", n))
            }
        }));
    }
    table
}

pub fn game_status(snapshot: &GameSnapshot) -> String {
    let mut lines = Vec::new();
    lines.push(format!(
        "Period {}   Time remaining {}{}",
        snapshot.period,
        snapshot.countdown,
        if snapshot.urgent { " (hurry!)" } else { "" }
    ));
    lines.push(format!("Current balance {}", snapshot.balance));

    match (snapshot.selected_number, snapshot.bet_locked) {
        (Some(n), true) => lines.push(format!("Bet placed on #{} - good luck!", n)),
        (Some(n), false) => lines.push(format!(
            "Selected #{}   place bet {} to win {}",
            n,
            snapshot.stake,
            snapshot
                .potential_win
                .map(|w| w.to_string())
                .unwrap_or_default()
        )),
        (None, _) => lines.push(format!("No number selected (stake {})", snapshot.stake)),
    }

    if snapshot.suggestion_pending {
        lines.push("AI is picking a number...".to_string());
    }

    lines.join("\n")
}

pub fn home(player: &Player, config: &GameConfig) -> String {
    format!(
        "{}\nPick Lucky Number - win {}x your bet amount!",
        player_card(player),
        config.bet.multiplier
    )
}

use egui::*;
use strum::IntoEnumIterator;
use web_time::{Duration, Instant};

use crate::graph::{Canvas, GeneratorKind};
use crate::round::{
    BestTimes, Game, GameEvent, Level, MAX_ROUND, PointerHub, records::format_time,
    ticker::ANIMATION_FPS,
};

mod board;
mod color;

pub const NATIVE: bool = cfg!(not(target_arch = "wasm32"));

fn load_or<T: serde::de::DeserializeOwned>(
    storage: Option<&dyn eframe::Storage>,
    key: &str,
    default: impl FnOnce() -> T,
) -> T {
    match storage.and_then(|s| eframe::get_value(s, key)) {
        Some(value) => value,
        None => {
            log::debug!("nothing usable stored under \"{key}\", using default");
            default()
        },
    }
}

mod storage_keys {
    pub const LEVEL: &str = "app::level";
    pub const GENERATOR: &str = "app::generator";
    pub const RECORDS: &str = "app::records";
}

#[derive(Clone, Copy, Debug)]
struct GameResult {
    level: Level,
    time: Duration,
    /// place in the best times, from zero
    rank: Option<usize>,
}

pub struct State {
    level: Level,
    kind: GeneratorKind,
    canvas: Canvas,
    records: BestTimes,

    hub: PointerHub,
    game: Option<Game>,
    last_result: Option<GameResult>,
}

impl State {
    /// Called once before the first frame.
    pub fn new(cc: &eframe::CreationContext<'_>) -> Self {
        use storage_keys::*;
        Self {
            level: load_or(cc.storage, LEVEL, Level::default),
            kind: load_or(cc.storage, GENERATOR, GeneratorKind::default),
            canvas: Canvas::default(),
            records: load_or(cc.storage, RECORDS, BestTimes::default),

            hub: PointerHub::new(),
            game: None,
            last_result: None,
        }
    }

    fn start_game(&mut self, now: Instant) {
        self.abandon_game();
        self.last_result = None;
        let game = Game::new(self.level, self.kind, self.canvas, &mut self.hub, now);
        self.game = Some(game);
    }

    fn abandon_game(&mut self) {
        if let Some(mut game) = self.game.take() {
            if !game.is_won() {
                log::info!("game abandoned in round {}", game.round_nr() + 1);
            }
            game.abandon(&mut self.hub);
        }
    }

    fn game_running(&self) -> bool {
        self.game.as_ref().is_some_and(|g| !g.is_won())
    }

    fn draw_menu(&mut self, ui: &mut Ui, now: Instant) {
        ui.heading("Untangle");
        widgets::global_theme_preference_buttons(ui);
        ui.add_space(8.0);

        ui.label("Level");
        for level in Level::iter() {
            ui.radio_value(&mut self.level, level, level.name());
        }
        ui.add_space(8.0);

        ui.label("Graphs");
        for kind in GeneratorKind::iter() {
            ui.radio_value(&mut self.kind, kind, kind.name())
                .on_hover_text(kind.description());
        }
        ui.add_space(8.0);

        if ui.button("New game").clicked() {
            self.start_game(now);
        }
        if self.game_running() && ui.button("Give up").clicked() {
            self.abandon_game();
        }
        if NATIVE && ui.button("Quit").clicked() {
            ui.ctx().send_viewport_cmd(ViewportCommand::Close);
        }

        ui.separator();
        ui.label(format!("Best times ({})", self.level.name()));
        let times = self.records.times(self.level);
        if times.is_empty() {
            ui.weak("none yet");
        }
        for (i, &time) in times.iter().enumerate() {
            ui.monospace(format!("{}. {}", i + 1, format_time(time)));
        }
        if !times.is_empty() && ui.small_button("clear all records").clicked() {
            self.records.clear();
        }
    }

    fn draw_status(&self, ui: &mut Ui, now: Instant) {
        let Some(game) = &self.game else {
            ui.label("Drag the nodes until no two edges cross. Start with \"New game\".");
            return;
        };
        ui.horizontal(|ui| {
            let round = usize::min(game.round_nr() + 1, MAX_ROUND);
            ui.label(format!(
                "{} | {} | round {round} / {MAX_ROUND}",
                game.level().name(),
                game.kind().name()
            ));
            ui.monospace(format_time(game.elapsed(now)));
            if let Some(result) = &self.last_result {
                let place = match result.rank {
                    Some(rank) => format!(", new best time #{}", rank + 1),
                    None => String::new(),
                };
                ui.strong(format!(
                    "solved {} in {}{place}",
                    result.level.name(),
                    format_time(result.time)
                ));
            }
        });
    }
}

impl eframe::App for State {
    /// Called by the frame work to save state before shutdown.
    fn save(&mut self, storage: &mut dyn eframe::Storage) {
        use storage_keys::*;
        eframe::set_value(storage, LEVEL, &self.level);
        eframe::set_value(storage, GENERATOR, &self.kind);
        eframe::set_value(storage, RECORDS, &self.records);
    }

    fn update(&mut self, ctx: &Context, _frame: &mut eframe::Frame) {
        let now = Instant::now();

        SidePanel::left("left_panel").show(ctx, |ui| {
            ui.vertical(|ui| self.draw_menu(ui, now));
        });

        CentralPanel::default().show(ctx, |ui| {
            self.draw_status(ui, now);
            let Some(game) = &mut self.game else {
                return;
            };
            board::draw_game(ui, game, &mut self.hub, now);
            match game.update(&mut self.hub, now) {
                GameEvent::Won(time) => {
                    let level = game.level();
                    let rank = self.records.insert(level, time);
                    self.last_result = Some(GameResult { level, time, rank });
                },
                GameEvent::RoundSolved(nr) => {
                    log::debug!("round {} solved after {:?}", nr + 1, game.elapsed(now));
                },
                GameEvent::Ticked | GameEvent::Idle => {},
            }
        });

        if self.game_running() {
            ctx.request_repaint_after(Duration::from_secs(1) / ANIMATION_FPS);
        }
    }
}

impl Drop for State {
    fn drop(&mut self) {
        self.abandon_game();
    }
}

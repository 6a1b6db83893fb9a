mod app;
mod bridge;
mod config;
mod features;
mod gfx;

use anyhow::{anyhow, Result};
use app::Show;
use bridge::{BridgeMessage, HostCommand, PriceInput};
use calloop::channel::{channel, Event};
use calloop::EventLoop;
use config::Config;
use features::EntityKind;
use gfx::render::SceneLog;
use log::{info, warn};
use std::io::BufRead;
use std::time::{Duration, Instant};

struct Host {
    show: Show,
    scene: SceneLog,
    inbox: Vec<String>,
    stdin_closed: bool,
    quit: bool,
}

impl Host {
    fn new(config: &Config) -> Self {
        Self {
            show: Show::new(config),
            scene: SceneLog::new(),
            inbox: Vec::new(),
            stdin_closed: false,
            quit: false,
        }
    }

    fn emit(&self, message: BridgeMessage) {
        println!("{}", message.to_line());
    }

    fn handle_line(&mut self, line: &str) {
        match HostCommand::parse(line) {
            Ok(command) => {
                let accepted = self.apply(&command);
                self.emit(BridgeMessage::ack(&command, accepted));
            }
            Err(err) => {
                warn!("Rejected host input {:?}: {:#}", line, err);
                self.emit(BridgeMessage::error(&err));
            }
        }
    }

    fn apply(&mut self, command: &HostCommand) -> bool {
        let scene = &mut self.scene;
        match command {
            HostCommand::Play => self.show.start(scene),
            HostCommand::Reset => {
                self.show.reset(scene);
                true
            }
            HostCommand::Replay => {
                self.show.reset(scene);
                self.show.start(scene)
            }
            HostCommand::Price(price) => {
                self.set_price(price);
                true
            }
            HostCommand::Extend => self.show.extend(scene),
            HostCommand::Spawn => self.show.spawn_one(scene).is_some(),
            HostCommand::StarsStart => self.show.start_spawning(),
            HostCommand::StarsStop => {
                self.show.stop_spawning();
                true
            }
            HostCommand::Pause => {
                self.show.pause();
                true
            }
            HostCommand::Resume => {
                self.show.resume();
                true
            }
            HostCommand::Status => {
                self.emit(BridgeMessage::Status(self.show.status()));
                true
            }
            HostCommand::Quit => {
                self.quit = true;
                true
            }
            HostCommand::Settings(settings) => {
                if let Some(price) = &settings.price {
                    self.set_price(price);
                }
                if settings.auto_play == Some(true) && !self.show.is_running() {
                    self.show.start(&mut self.scene);
                }
                true
            }
        }
    }

    fn set_price(&mut self, price: &PriceInput) {
        match price {
            PriceInput::Value(value) => self.show.set_price(*value),
            PriceInput::Text(text) => self.show.update_price(text.clone()),
        }
    }

    fn finished(&self) -> bool {
        self.quit || (self.stdin_closed && !self.show.is_running())
    }
}

fn spawn_stdin_reader(sender: calloop::channel::Sender<String>) {
    std::thread::spawn(move || {
        let stdin = std::io::stdin();
        for line in stdin.lock().lines() {
            match line {
                Ok(line) => {
                    if sender.send(line).is_err() {
                        break;
                    }
                }
                Err(e) => {
                    warn!("stdin read failed: {}", e);
                    break;
                }
            }
        }
    });
}

fn main() -> Result<()> {
    env_logger::init();
    info!("Starting roadshow...");

    let config = Config::load().unwrap_or_else(|e| {
        warn!("Config load failed, using defaults: {:#}", e);
        Config::default()
    });
    if std::env::args().any(|arg| arg == "--write-config") {
        config.save()?;
        info!("Wrote current settings to the config directory");
        return Ok(());
    }

    let frame = Duration::from_secs_f32(1.0 / config.host.fps_cap.max(1) as f32);

    let mut event_loop: EventLoop<Host> = EventLoop::try_new()?;
    let (sender, commands) = channel::<String>();
    event_loop
        .handle()
        .insert_source(commands, |event, _, host| match event {
            Event::Msg(line) => host.inbox.push(line),
            Event::Closed => host.stdin_closed = true,
        })
        .map_err(|e| anyhow!("Failed to register command channel: {}", e.error))?;
    spawn_stdin_reader(sender);

    let mut host = Host::new(&config);
    host.emit(BridgeMessage::ready());

    if config.sequence.auto_play {
        host.show.start(&mut host.scene);
    }

    let mut last_frame = Instant::now();
    info!("Starting main loop at {} fps", config.host.fps_cap);
    while !host.finished() {
        let budget = frame.saturating_sub(last_frame.elapsed());
        event_loop.dispatch(Some(budget), &mut host)?;

        for line in std::mem::take(&mut host.inbox) {
            host.handle_line(&line);
        }

        let now = Instant::now();
        let dt = now.duration_since(last_frame).as_secs_f32();
        last_frame = now;

        host.show.update(dt, &mut host.scene);
        for event in host.show.drain_events() {
            host.emit(event.into());
        }
    }

    info!(
        "Shutting down ({} visuals created, {} destroyed, {} still live)",
        host.scene.created,
        host.scene.destroyed,
        host.scene.live_count()
    );
    if host.scene.count_of(EntityKind::Star) > 0 {
        warn!("{} stars still on screen at exit", host.scene.count_of(EntityKind::Star));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use bridge::HostSettings;

    fn host() -> Host {
        let mut config = Config::default();
        config.sequence.start_delay = 0.1;
        config.stars.seed = Some(1);
        config.leaves.seed = Some(1);
        Host::new(&config)
    }

    #[test]
    fn second_play_is_rejected() {
        let mut host = host();
        assert!(host.apply(&HostCommand::Play));
        assert!(!host.apply(&HostCommand::Play));
        assert!(host.show.is_running());
    }

    #[test]
    fn replay_restarts_from_the_top() {
        let mut host = host();
        host.apply(&HostCommand::Play);
        for _ in 0..20 {
            host.show.update(0.1, &mut host.scene);
        }
        host.show.drain_events();
        assert!(host.apply(&HostCommand::Replay));
        assert_eq!(host.show.status().phase, "Delay");
        assert_eq!(host.scene.live_count(), 0);
    }

    #[test]
    fn extend_is_rejected_while_growth_is_disabled() {
        let mut host = host();
        assert!(!host.apply(&HostCommand::Extend));
        assert_eq!(host.show.status().road_segments, 0);
    }

    #[test]
    fn settings_set_price_and_auto_play() {
        let mut host = host();
        let settings = HostSettings {
            price: Some(PriceInput::Text("¥8".to_string())),
            auto_play: Some(true),
        };
        assert!(host.apply(&HostCommand::Settings(settings.clone())));
        assert!(host.show.is_running());
        assert_eq!(host.show.status().price.as_deref(), Some("¥8"));

        // Already running: accepted, sequence untouched.
        assert!(host.apply(&HostCommand::Settings(settings)));
        assert_eq!(host.show.status().phase, "Delay");
    }

    #[test]
    fn price_and_pause_commands_reach_the_show() {
        let mut host = host();
        assert!(host.apply(&HostCommand::Price(PriceInput::Value(4.0))));
        assert_eq!(host.show.status().price.as_deref(), Some("¥4.00"));
        assert!(host.apply(&HostCommand::Pause));
        assert!(host.show.status().paused);
        assert!(host.apply(&HostCommand::Resume));
        assert!(!host.show.status().paused);
    }

    #[test]
    fn quit_ends_the_loop() {
        let mut host = host();
        assert!(!host.finished());
        assert!(host.apply(&HostCommand::Quit));
        assert!(host.finished());
    }

    #[test]
    fn closed_stdin_waits_for_the_sequence() {
        let mut host = host();
        host.apply(&HostCommand::Play);
        host.stdin_closed = true;
        assert!(!host.finished());
        host.apply(&HostCommand::Reset);
        assert!(host.finished());
    }
}

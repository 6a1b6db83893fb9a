use crate::app::{ShowEvent, ShowStatus};
use anyhow::{anyhow, bail, Context, Result};
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum PriceInput {
    Value(f32),
    Text(String),
}

/// Settings object a host page may send instead of a text command.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HostSettings {
    #[serde(default)]
    pub price: Option<PriceInput>,
    #[serde(default)]
    pub auto_play: Option<bool>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum HostCommand {
    Play,
    Reset,
    Replay,
    Price(PriceInput),
    Extend,
    Spawn,
    StarsStart,
    StarsStop,
    Pause,
    Resume,
    Status,
    Quit,
    Settings(HostSettings),
}

impl HostCommand {
    /// Parses one input line, either a word command or a JSON settings object.
    pub fn parse(line: &str) -> Result<Self> {
        let line = line.trim();
        if line.is_empty() {
            bail!("empty command");
        }
        if line.starts_with('{') {
            let settings = serde_json::from_str(line).context("invalid settings JSON")?;
            return Ok(HostCommand::Settings(settings));
        }

        let (word, rest) = match line.split_once(char::is_whitespace) {
            Some((word, rest)) => (word, rest.trim()),
            None => (line, ""),
        };
        let command = match word.to_ascii_lowercase().as_str() {
            "play" => HostCommand::Play,
            "reset" => HostCommand::Reset,
            "replay" => HostCommand::Replay,
            "extend" => HostCommand::Extend,
            "spawn" => HostCommand::Spawn,
            "pause" => HostCommand::Pause,
            "resume" => HostCommand::Resume,
            "status" => HostCommand::Status,
            "quit" | "exit" => HostCommand::Quit,
            "price" => {
                if rest.is_empty() {
                    bail!("price needs a value");
                }
                match rest.parse::<f32>() {
                    Ok(value) if value.is_finite() => HostCommand::Price(PriceInput::Value(value)),
                    _ => HostCommand::Price(PriceInput::Text(rest.to_string())),
                }
            }
            "stars" => match rest {
                "start" => HostCommand::StarsStart,
                "stop" => HostCommand::StarsStop,
                other => bail!("stars expects start or stop, got {:?}", other),
            },
            other => return Err(anyhow!("unknown command: {}", other)),
        };
        Ok(command)
    }

    pub fn name(&self) -> &'static str {
        match self {
            HostCommand::Play => "play",
            HostCommand::Reset => "reset",
            HostCommand::Replay => "replay",
            HostCommand::Price(_) => "price",
            HostCommand::Extend => "extend",
            HostCommand::Spawn => "spawn",
            HostCommand::StarsStart => "stars start",
            HostCommand::StarsStop => "stars stop",
            HostCommand::Pause => "pause",
            HostCommand::Resume => "resume",
            HostCommand::Status => "status",
            HostCommand::Quit => "quit",
            HostCommand::Settings(_) => "settings",
        }
    }
}

/// One JSON line written back to the host.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum BridgeMessage {
    Ready { message: String, timestamp: String },
    Ack { command: String, accepted: bool },
    Error { message: String },
    Phase { name: String },
    StarDisappeared { id: String },
    RoadGenerated { count: usize },
    RoadOnboarded { count: usize },
    PriceChanged { price: String },
    AnimationComplete,
    Status(ShowStatus),
}

impl BridgeMessage {
    pub fn ready() -> Self {
        BridgeMessage::Ready {
            message: "roadshow ready".to_string(),
            timestamp: local_timestamp(),
        }
    }

    pub fn ack(command: &HostCommand, accepted: bool) -> Self {
        BridgeMessage::Ack {
            command: command.name().to_string(),
            accepted,
        }
    }

    pub fn error(err: &anyhow::Error) -> Self {
        BridgeMessage::Error {
            message: format!("{:#}", err),
        }
    }

    pub fn to_line(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|e| {
            format!(r#"{{"type":"error","message":"unserializable message: {}"}}"#, e)
        })
    }
}

impl From<ShowEvent> for BridgeMessage {
    fn from(event: ShowEvent) -> Self {
        match event {
            ShowEvent::PhaseEntered(name) => BridgeMessage::Phase {
                name: name.to_string(),
            },
            ShowEvent::StarDisappeared(id) => BridgeMessage::StarDisappeared { id: id.to_string() },
            ShowEvent::RoadGrown { count } => BridgeMessage::RoadGenerated { count },
            ShowEvent::RoadOnboarded { count } => BridgeMessage::RoadOnboarded { count },
            ShowEvent::PriceChanged(price) => BridgeMessage::PriceChanged { price },
            ShowEvent::SequenceComplete => BridgeMessage::AnimationComplete,
        }
    }
}

fn local_timestamp() -> String {
    let now = OffsetDateTime::now_local().unwrap_or_else(|_| OffsetDateTime::now_utc());
    format!(
        "{:04}-{:02}-{:02}T{:02}:{:02}:{:02}",
        now.year(),
        u8::from(now.month()),
        now.day(),
        now.hour(),
        now.minute(),
        now.second()
    )
}

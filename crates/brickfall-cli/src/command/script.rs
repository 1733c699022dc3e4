use std::{path::PathBuf, time::Duration};

use anyhow::Context as _;
use brickfall_engine::{Engine, ShapeSequence, ShapeSource};
use chrono::Utc;
use clap::Args;

use crate::{
    schema::{
        record::{ScriptRecord, ScriptStep},
        script::{ScriptCommand, parse_script},
    },
    util,
};

use super::{EngineArg, OutputArg};

#[derive(Debug, Clone, Args)]
pub struct ScriptArg {
    /// Command script to replay (`-` reads standard input)
    script: PathBuf,
    /// Shapes to spawn, in order, repeating once exhausted (e.g. "IOTZS")
    #[arg(long, default_value = "IOTZS")]
    shapes: String,
    #[clap(flatten)]
    engine: EngineArg,
    #[clap(flatten)]
    output: OutputArg,
}

pub(crate) fn run(arg: &ScriptArg) -> anyhow::Result<()> {
    let ScriptArg {
        script,
        shapes,
        engine,
        output,
    } = arg;

    let config = engine.load_config()?;
    let sequence: ShapeSequence = shapes
        .parse()
        .with_context(|| format!("Invalid shape sequence: {shapes}"))?;
    let text = util::read_text_input("script", script)?;
    let commands = parse_script(&text)
        .map_err(anyhow::Error::msg)
        .with_context(|| format!("Failed to parse script: {}", script.display()))?;

    let mut engine = Engine::with_shape_source(config, sequence)?;
    let steps = commands
        .into_iter()
        .map(|(line, command)| execute(&mut engine, line, command))
        .collect();

    let snapshot = engine.snapshot();
    let record = ScriptRecord {
        recorded_at: Utc::now(),
        config,
        shapes: shapes.clone(),
        steps,
        final_stats: engine.stats().clone(),
        final_board: snapshot.render_lines(),
        final_snapshot: snapshot,
    };
    tracing::info!(
        score = record.final_stats.score(),
        lines = record.final_stats.total_cleared_lines(),
        game_over = record.final_snapshot.game_over,
        "script finished"
    );
    output.write_record(&record)
}

fn execute<S>(engine: &mut Engine<S>, line: usize, command: ScriptCommand) -> ScriptStep
where
    S: ShapeSource,
{
    let mut event = None;
    let applied = match command {
        ScriptCommand::Left => engine.move_left(),
        ScriptCommand::Right => engine.move_right(),
        ScriptCommand::Rotate => engine.rotate(),
        ScriptCommand::Drop => engine.hard_drop(),
        ScriptCommand::SoftOn => engine.set_soft_drop(true),
        ScriptCommand::SoftOff => engine.set_soft_drop(false),
        ScriptCommand::Pause => engine.toggle_pause(),
        ScriptCommand::Wait(ms) => {
            let result = engine.tick(Duration::from_millis(ms));
            event = Some(result);
            !result.is_game_over()
        }
    };
    if !applied {
        tracing::debug!(line, %command, "command not applied");
    }
    ScriptStep {
        line,
        command,
        applied,
        event,
    }
}

#[cfg(test)]
mod tests {
    use brickfall_engine::{EngineConfig, EngineEvent, ShapeKind};

    use super::*;

    fn run_script(shapes: &str, script: &str) -> (Engine<ShapeSequence>, Vec<ScriptStep>) {
        let mut engine =
            Engine::with_shape_source(EngineConfig::default(), shapes.parse().unwrap()).unwrap();
        let steps = parse_script(script)
            .unwrap()
            .into_iter()
            .map(|(line, command)| execute(&mut engine, line, command))
            .collect();
        (engine, steps)
    }

    #[test]
    fn test_drop_o_in_corner() {
        let (engine, steps) = run_script(
            "O",
            "left\nwait 30\nleft\nwait 30\nleft\nwait 30\nleft\nwait 30\nleft\ndrop\n",
        );
        assert!(steps[..8].iter().all(|s| s.applied));
        // The fifth left hits the wall.
        assert!(!steps[8].applied);
        assert!(steps[9].applied);
        assert!(engine.board().is_filled(0, 19));
        assert!(engine.board().is_filled(1, 18));
        assert_eq!(engine.stats().completed_pieces(), 1);
    }

    #[test]
    fn test_wait_reports_events() {
        let (engine, steps) = run_script("IT", "rotate\nwait 100000\n");
        assert_eq!(
            steps[1].event,
            Some(EngineEvent::PieceLocked { lines_cleared: 0 })
        );
        assert_eq!(engine.active_piece().unwrap().kind(), ShapeKind::T);
    }

    #[test]
    fn test_pause_blocks_moves() {
        let (_, steps) = run_script("T", "pause\nleft\nrotate\npause\nrotate\n");
        let applied: Vec<_> = steps.iter().map(|s| s.applied).collect();
        assert_eq!(applied, [true, false, false, true, true]);
    }
}

mod tests {
    use embassy_time::{Duration, Instant};
    use ledgrid_engine::color::Channel;
    use ledgrid_engine::command::CommandEffects;
    use ledgrid_engine::{
        AnimationCommand, AnimationConfig, ColorEngine, ColorFunctionRegistry, CommandChannel, CommandProcessor,
    };

    fn engine() -> ColorEngine {
        ColorEngine::new(4, &AnimationConfig::default(), ColorFunctionRegistry::with_builtins()).unwrap()
    }

    #[test]
    fn test_engine_commands_leave_no_effects() {
        let commands = CommandChannel::<8>::new();
        let mut processor = CommandProcessor::new(commands.receiver());
        let mut engine = engine();

        let effects = processor.process_pending(&mut engine, Instant::from_millis(0));
        assert_eq!(effects, CommandEffects::default());
        assert!(!effects.has_effects());

        commands
            .sender()
            .try_send(AnimationCommand::SetStep {
                channel: Channel::Green,
                step: 3,
            })
            .unwrap();
        let effects = processor.process_pending(&mut engine, Instant::from_millis(0));
        assert!(!effects.has_effects());
        assert_eq!(engine.animator().phase(Channel::Green).step, 3);
    }

    #[test]
    fn test_scheduler_commands_become_effects() {
        let commands = CommandChannel::<8>::new();
        let mut processor = CommandProcessor::new(commands.receiver());
        let mut engine = engine();
        let sender = commands.sender();

        sender.try_send(AnimationCommand::Pause).unwrap();
        sender.try_send(AnimationCommand::Resume).unwrap();
        sender.try_send(AnimationCommand::SetGamma(2.2)).unwrap();
        sender
            .try_send(AnimationCommand::Crossfade {
                image: 0,
                from: 0,
                to: 100,
                duration: Duration::from_millis(500),
            })
            .unwrap();
        let effects = processor.process_pending(&mut engine, Instant::from_millis(0));
        assert!(effects.has_effects());
        assert_eq!(effects.paused, Some(false));
        assert_eq!(effects.gamma, Some(2.2));
        assert!(!effects.single_step);
        assert_eq!(effects.crossfade.map(|fade| fade.image()), Some(0));

        sender.try_send(AnimationCommand::Step).unwrap();
        assert!(processor.process_pending(&mut engine, Instant::from_millis(0)).has_effects());
    }
}

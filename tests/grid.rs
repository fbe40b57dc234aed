mod tests {
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::{Arc, Mutex};
    use std::thread;

    use ledgrid_engine::color::{Channel, Rgb};
    use ledgrid_engine::{Error, GammaLut, GridConfig, LedGrid, OutputSink, TransmitError};

    #[derive(Clone, Default)]
    struct RecordingSink {
        frames: Arc<Mutex<Vec<Vec<u8>>>>,
    }

    impl RecordingSink {
        fn frames(&self) -> Vec<Vec<u8>> {
            self.frames.lock().unwrap().clone()
        }
    }

    impl OutputSink for RecordingSink {
        fn transmit(&mut self, frame: &[u8]) -> Result<(), TransmitError> {
            self.frames.lock().unwrap().push(frame.to_vec());
            Ok(())
        }
    }

    struct FailingSink;

    impl OutputSink for FailingSink {
        fn transmit(&mut self, _frame: &[u8]) -> Result<(), TransmitError> {
            Err(TransmitError::Driver("bus unplugged".into()))
        }
    }

    fn grid(width: usize, height: usize) -> (LedGrid<RecordingSink>, RecordingSink) {
        let sink = RecordingSink::default();
        let config = GridConfig {
            width,
            height,
            ..GridConfig::default()
        };
        (LedGrid::new(&config, sink.clone()).unwrap(), sink)
    }

    #[test]
    fn test_default_config() {
        let config = GridConfig::default();
        assert_eq!((config.width, config.height), (10, 10));
        assert_eq!(config.gamma, 1.0);
        assert_eq!(config.strand_length, None);
    }

    #[test]
    fn test_red_grid_serpentine_scenario() {
        let (grid, sink) = grid(10, 10);
        grid.with_store(|store| store.set_all(Rgb::new(200, 0, 0)));
        grid.show().unwrap();

        let frames = sink.frames();
        assert_eq!(frames.len(), 1);
        let frame = &frames[0];
        assert_eq!(frame.len(), 300);
        assert_eq!(&frame[59 * 3..60 * 3], &[200, 0, 0]);
        assert!(frame.chunks(3).all(|p| p == [200, 0, 0]));
    }

    #[test]
    fn test_odd_row_pixel_position() {
        let (grid, sink) = grid(10, 10);
        grid.set_pixel(0, 5, Channel::Green, 77).unwrap();
        grid.show().unwrap();
        let frame = &sink.frames()[0];
        assert_eq!(&frame[59 * 3..60 * 3], &[0, 77, 0]);
        assert_eq!(frame.iter().filter(|&&v| v != 0).count(), 1);
    }

    #[test]
    fn test_gamma_is_applied_on_output() {
        let (grid, sink) = grid(2, 1);
        grid.set_color(0, 0, Rgb::new(128, 255, 0)).unwrap();
        grid.set_gamma(2.0).unwrap();
        grid.show().unwrap();
        assert_eq!(&sink.frames()[0][..3], &[64, 255, 0]);
        assert_eq!(grid.pixel(0, 0).unwrap(), Rgb::new(128, 255, 0));
        assert!(grid.set_gamma(5.0).is_err());
        assert_eq!(grid.gamma().exponent(), Some(2.0));
    }

    #[test]
    fn test_gamma_from_color_map() {
        let (grid, _) = grid(1, 1);
        grid.set_color(0, 0, Rgb::new(1, 2, 3)).unwrap();
        grid.set_gamma_lut(GammaLut::from_map("1 10\n2 20\n3 30\n".as_bytes()).unwrap());
        assert_eq!(grid.frame(), vec![10, 20, 30]);
    }

    #[test]
    fn test_crossfade_through_grid() {
        let (grid, _) = grid(1, 1);
        let next = grid.new_image();
        grid.set_pixel_in(next, 0, 0, Channel::Blue, 100).unwrap();
        grid.select_image(0, 50);
        assert_eq!(grid.frame(), vec![0, 0, 50]);
        grid.select_image(9, 0);
        assert_eq!((grid.current_image(), grid.fade_step()), (0, 50));
    }

    #[test]
    fn test_strand_padding() {
        let sink = RecordingSink::default();
        let config = GridConfig {
            width: 2,
            height: 2,
            gamma: 1.0,
            strand_length: Some(6),
        };
        let grid = LedGrid::new(&config, sink.clone()).unwrap();
        grid.with_store(|store| store.set_all(Rgb::new(1, 1, 1)));
        grid.show().unwrap();

        let frame = &sink.frames()[0];
        assert_eq!(frame.len(), 18);
        assert!(frame[..6].iter().all(|&v| v == 0));
        assert!(frame[6..].iter().all(|&v| v == 1));
        assert_eq!(grid.strand_length(), 6);
    }

    #[test]
    fn test_short_strand_is_rejected() {
        let config = GridConfig {
            width: 3,
            height: 3,
            gamma: 1.0,
            strand_length: Some(8),
        };
        assert!(matches!(
            LedGrid::new(&config, RecordingSink::default()),
            Err(Error::OutOfDomain { .. })
        ));
    }

    #[test]
    fn test_transmit_failure_is_propagated() {
        let grid = LedGrid::new(&GridConfig::default(), FailingSink).unwrap();
        let err = grid.show().unwrap_err();
        assert!(matches!(err, Error::Transmit(TransmitError::Driver(_))));
        assert!(!err.is_contract_violation());
        // the guard is released after a failed show
        assert!(grid.show().is_err());
    }

    #[test]
    fn test_frames_are_never_torn() {
        let (grid, sink) = grid(8, 8);
        grid.with_store(|store| {
            store.set_all(Rgb::new(10, 10, 10));
            let second = store.new_image();
            store.image_mut(second).unwrap().fill(Rgb::new(20, 20, 20));
        });
        let grid = Arc::new(grid);
        let done = Arc::new(AtomicBool::new(false));

        let selector = {
            let grid = Arc::clone(&grid);
            let done = Arc::clone(&done);
            thread::spawn(move || {
                let mut index = 0;
                while !done.load(Ordering::Relaxed) {
                    index = 1 - index;
                    grid.select_image(index, 0);
                }
            })
        };
        let renderers: Vec<_> = (0..2)
            .map(|_| {
                let grid = Arc::clone(&grid);
                thread::spawn(move || {
                    for _ in 0..200 {
                        grid.show().unwrap();
                    }
                })
            })
            .collect();
        for renderer in renderers {
            renderer.join().unwrap();
        }
        done.store(true, Ordering::Relaxed);
        selector.join().unwrap();

        let frames = sink.frames();
        assert_eq!(frames.len(), 400);
        for frame in frames {
            assert!(frame.iter().all(|&v| v == frame[0]));
            assert!(frame[0] == 10 || frame[0] == 20);
        }
    }

    #[test]
    fn test_guarded_store_access() {
        let (grid, sink) = grid(2, 2);
        let index = grid.with_store_guarded(|store| {
            let index = store.new_image();
            store.select_image(index, 0);
            store.set_all(Rgb::new(5, 6, 7));
            index
        });
        assert_eq!(index, 1);
        assert_eq!(grid.image_count(), 2);
        grid.show().unwrap();
        assert_eq!(&sink.frames()[0][..3], &[5, 6, 7]);
    }

    #[test]
    fn test_image_file_helpers() {
        let dir = std::env::temp_dir().join(format!("ledgrid-grid-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("frame.txt");

        let (grid, _) = grid(3, 2);
        grid.set_color(2, 1, Rgb::new(9, 8, 7)).unwrap();
        assert_eq!(grid.save_image_file(&path, None).unwrap(), 0);
        grid.clear();
        assert_eq!(grid.load_image_file(&path, Some(0)).unwrap(), 0);
        assert_eq!(grid.pixel(2, 1).unwrap(), Rgb::new(9, 8, 7));
        assert!(grid.save_image_file(dir.join("other.txt"), Some(3)).is_err());
        assert!(!dir.join("other.txt").exists());

        std::fs::remove_dir_all(&dir).unwrap();
    }
}

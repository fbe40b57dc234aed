mod tests {
    use ledgrid_engine::color::Channel;
    use ledgrid_engine::waveform::WaveParams;
    use ledgrid_engine::{Error, WaveformTable};
    use proptest::prelude::*;

    fn table(size: usize, fade_steps: usize, exponent: f64) -> WaveformTable {
        let mut table = WaveformTable::new(size, fade_steps).unwrap();
        for channel in Channel::ALL {
            table.recalc(channel, 255.0, exponent).unwrap();
        }
        table
    }

    #[test]
    fn test_dimensions() {
        let table = WaveformTable::new(10, 10).unwrap();
        assert_eq!(table.half_period(), 90);
        assert_eq!(table.period(), 180);
        assert_eq!(table.table(Channel::Red).len(), 180);
        assert!(table.table(Channel::Blue).iter().all(|&v| v == 0));
        assert_eq!(table.params(Channel::Red), None);
    }

    #[test]
    fn test_invalid_dimensions() {
        assert!(matches!(WaveformTable::new(1, 10), Err(Error::OutOfDomain { .. })));
        assert!(matches!(WaveformTable::new(10, 0), Err(Error::OutOfDomain { .. })));
    }

    #[test]
    fn test_small_table_values() {
        let table = table(2, 2, 1.0);
        assert_eq!(table.table(Channel::Green), &[128, 181, 255, 181]);
    }

    #[test]
    fn test_exponent_two_starts_dark_and_peaks_at_half() {
        let table = table(10, 10, 2.0);
        let red = table.table(Channel::Red);
        assert_eq!(red[0], 0);
        assert_eq!(red[90], 255);
        assert_eq!(red.iter().copied().max(), Some(255));
        for pair in red[..=90].windows(2) {
            assert!(pair[0] <= pair[1]);
        }
    }

    #[test]
    fn test_table_is_mirror_symmetric() {
        let table = table(8, 5, 1.4);
        let red = table.table(Channel::Red);
        for i in 1..table.period() {
            assert_eq!(red[i], red[table.period() - i]);
        }
    }

    #[test]
    fn test_recalc_records_params() {
        let mut table = WaveformTable::new(4, 4).unwrap();
        table.recalc(Channel::Blue, 200.0, 1.5).unwrap();
        assert_eq!(
            table.params(Channel::Blue),
            Some(WaveParams {
                max_value: 200.0,
                exponent: 1.5
            })
        );
        assert_eq!(table.params(Channel::Red), None);
    }

    #[test]
    fn test_recalc_domain() {
        let mut table = WaveformTable::new(4, 4).unwrap();
        assert!(table.recalc(Channel::Red, 255.0, 0.5).is_err());
        assert!(table.recalc(Channel::Red, 0.0, 1.0).is_err());
        assert!(table.recalc(Channel::Red, f64::NAN, 1.0).is_err());
        assert!(table.recalc(Channel::Red, 255.0, f64::INFINITY).is_err());
    }

    #[test]
    fn test_sample_wraps_negative_steps() {
        let table = table(2, 2, 1.0);
        assert_eq!(table.sample(Channel::Red, -1), 181);
        assert_eq!(table.sample(Channel::Red, -2), 255);
        assert_eq!(table.sample(Channel::Red, 6), 255);
        assert_eq!(table.sample(Channel::Red, i64::MIN), table.sample(Channel::Red, 0));
    }

    #[test]
    fn test_dump_format() {
        let table = table(2, 2, 1.0);
        let mut out = Vec::new();
        table.write_dump(&mut out).unwrap();
        let channel = "\n128 181 \n255 181 \n\n";
        let expected = format!("2 2\n{channel}{channel}{channel}");
        assert_eq!(String::from_utf8(out).unwrap(), expected);
    }

    #[test]
    fn test_dump_file_matches_dump() {
        let dir = std::env::temp_dir().join(format!("ledgrid-waveform-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("waveform.txt");

        let table = table(3, 2, 2.0);
        table.write_dump_file(&path).unwrap();
        let mut expected = Vec::new();
        table.write_dump(&mut expected).unwrap();
        assert_eq!(std::fs::read(&path).unwrap(), expected);

        assert!(matches!(
            table.write_dump_file(dir.join("missing").join("waveform.txt")),
            Err(Error::Io(_))
        ));
        std::fs::remove_dir_all(&dir).unwrap();
    }

    proptest! {
        #[test]
        fn sample_is_periodic(step in -100_000i64..100_000, size in 2usize..16, fade_steps in 1usize..12) {
            let table = table(size, fade_steps, 1.0);
            let period = table.period() as i64;
            for channel in Channel::ALL {
                prop_assert_eq!(table.sample(channel, step), table.sample(channel, step + period));
                prop_assert_eq!(table.sample(channel, step), table.sample(channel, step - 3 * period));
            }
        }
    }
}

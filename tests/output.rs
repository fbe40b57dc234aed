mod tests {
    use std::io::{self, Write};

    use ledgrid_engine::color::Rgb;
    use ledgrid_engine::{OutputSink, SmartLedsSink, TransmitError, WriterSink};
    use smart_leds::SmartLedsWrite;

    #[derive(Default)]
    struct FakeStrip {
        pixels: Vec<Rgb>,
        broken: bool,
    }

    impl SmartLedsWrite for FakeStrip {
        type Error = &'static str;
        type Color = Rgb;

        fn write<T, I>(&mut self, iterator: T) -> Result<(), Self::Error>
        where
            T: IntoIterator<Item = I>,
            I: Into<Self::Color>,
        {
            if self.broken {
                return Err("strip offline");
            }
            self.pixels = iterator.into_iter().map(Into::into).collect();
            Ok(())
        }
    }

    struct BrokenWriter;

    impl Write for BrokenWriter {
        fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
            Err(io::Error::new(io::ErrorKind::BrokenPipe, "closed"))
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_writer_sink_writes_raw_frames() {
        let mut sink = WriterSink::new(Vec::new());
        sink.transmit(&[1, 2, 3]).unwrap();
        sink.transmit(&[4, 5, 6]).unwrap();
        assert_eq!(sink.into_inner(), vec![1, 2, 3, 4, 5, 6]);
    }

    #[test]
    fn test_writer_sink_reports_io_errors() {
        let mut sink = WriterSink::new(BrokenWriter);
        assert!(matches!(sink.transmit(&[0; 3]), Err(TransmitError::Io(_))));
    }

    #[test]
    fn test_smart_leds_sink_groups_pixels() {
        let mut sink = SmartLedsSink::new(FakeStrip::default());
        sink.transmit(&[1, 2, 3, 4, 5, 6]).unwrap();
        assert_eq!(sink.driver_mut().pixels, vec![Rgb::new(1, 2, 3), Rgb::new(4, 5, 6)]);
    }

    #[test]
    fn test_smart_leds_sink_reports_driver_errors() {
        let mut sink = SmartLedsSink::new(FakeStrip {
            broken: true,
            ..FakeStrip::default()
        });
        let err = sink.transmit(&[0; 3]).unwrap_err();
        assert!(err.to_string().contains("strip offline"));
    }
}

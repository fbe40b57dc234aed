mod tests {
    use std::collections::HashSet;

    use ledgrid_engine::{Error, SerpentineLayout};
    use proptest::prelude::*;

    #[test]
    fn test_even_rows_run_forward() {
        let layout = SerpentineLayout::new(10, 10);
        assert_eq!(layout.map(0, 0).unwrap(), 0);
        assert_eq!(layout.map(9, 0).unwrap(), 9);
        assert_eq!(layout.map(3, 4).unwrap(), 43);
    }

    #[test]
    fn test_odd_rows_run_backward() {
        let layout = SerpentineLayout::new(10, 10);
        assert_eq!(layout.map(0, 5).unwrap(), 59);
        assert_eq!(layout.map(9, 5).unwrap(), 50);
        assert_eq!(layout.map(0, 1).unwrap(), 19);
    }

    #[test]
    fn test_out_of_range_coordinate() {
        let layout = SerpentineLayout::new(4, 3);
        assert!(matches!(layout.map(4, 0), Err(Error::InvalidCoordinate { x: 4, y: 0 })));
        assert!(matches!(layout.map(0, 3), Err(Error::InvalidCoordinate { x: 0, y: 3 })));
    }

    proptest! {
        #[test]
        fn mapping_is_a_bijection(width in 1usize..24, height in 1usize..24) {
            let layout = SerpentineLayout::new(width, height);
            let mut seen = HashSet::new();
            for row in 0..height {
                for col in 0..width {
                    let index = layout.map(col, row).unwrap();
                    prop_assert!(index < width * height);
                    prop_assert!(seen.insert(index));
                }
            }
            prop_assert_eq!(seen.len(), layout.len());
        }

        #[test]
        fn mapping_matches_row_direction(width in 1usize..32, height in 1usize..32, col in 0usize..32, row in 0usize..32) {
            prop_assume!(col < width && row < height);
            let expected = if row % 2 == 0 { row * width + col } else { (row + 1) * width - 1 - col };
            prop_assert_eq!(SerpentineLayout::new(width, height).map(col, row).unwrap(), expected);
        }
    }
}

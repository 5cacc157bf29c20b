//! Tests for score types.

use super::*;

mod simple_score {
    use super::*;

    #[test]
    fn test_comparison() {
        let s1 = SimpleScore::of(-10);
        let s2 = SimpleScore::of(-5);
        let s3 = SimpleScore::of(0);

        assert!(s3 > s2);
        assert!(s2 > s1);
        assert!(s2.is_better_than(&s1));
        assert!(!s1.is_feasible());
        assert!(s3.is_feasible());
    }

    #[test]
    fn test_arithmetic() {
        let s1 = SimpleScore::of(10);
        let s2 = SimpleScore::of(3);

        assert_eq!(s1 + s2, SimpleScore::of(13));
        assert_eq!(s1 - s2, SimpleScore::of(7));
        assert_eq!(-s1, SimpleScore::of(-10));
    }

    #[test]
    fn test_parse() {
        assert_eq!(SimpleScore::parse("42").unwrap(), SimpleScore::of(42));
        assert_eq!(SimpleScore::parse(" -10 ").unwrap(), SimpleScore::of(-10));
        assert!(SimpleScore::parse("ten").is_err());
        assert_eq!(SimpleScore::of(-7).to_string_repr(), "-7");
    }
}

mod hard_soft_score {
    use super::*;

    #[test]
    fn test_hard_level_dominates() {
        let infeasible = HardSoftScore::of(-1, 0);
        let feasible = HardSoftScore::of(0, -1000);

        assert!(feasible > infeasible);
        assert!(feasible.is_feasible());
        assert!(!infeasible.is_feasible());
        assert!(HardSoftScore::of(0, -1) > HardSoftScore::of(0, -2));
    }

    #[test]
    fn test_arithmetic() {
        let a = HardSoftScore::of(-1, -10);
        let b = HardSoftScore::of(-2, 5);

        assert_eq!(a + b, HardSoftScore::of(-3, -5));
        assert_eq!(a - b, HardSoftScore::of(1, -15));
        assert_eq!(-a, HardSoftScore::of(1, 10));
    }

    #[test]
    fn test_parse() {
        assert_eq!(
            HardSoftScore::parse("0hard/-120soft").unwrap(),
            HardSoftScore::of(0, -120)
        );
        assert_eq!(
            HardSoftScore::parse(" -2hard / 3soft ").unwrap(),
            HardSoftScore::of(-2, 3)
        );
        assert!(HardSoftScore::parse("0hard").is_err());
        assert!(HardSoftScore::parse("0hard/0soft/0soft").is_err());
        assert!(HardSoftScore::parse("0/0soft").is_err());
    }

    #[test]
    fn test_display_matches_parse_format() {
        let score = HardSoftScore::of(-3, 42);
        assert_eq!(score.to_string(), "-3hard/42soft");
        assert_eq!(score.to_string_repr(), "-3hard/42soft");
        assert_eq!(score.to_level_numbers(), vec![-3, 42]);
    }
}

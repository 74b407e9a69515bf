use bookscan_challenges::book_scanning::*;

const SCENARIO: &str = "3 2 2\n1 2 3\n2 1 1\n0 1\n1 0 1\n2\n";

fn scenario() -> Challenge {
    SCENARIO.parse().unwrap()
}

#[test]
fn test_parse_scenario() {
    let challenge = scenario();
    assert_eq!(challenge.num_books, 3);
    assert_eq!(challenge.num_libraries(), 2);
    assert_eq!(challenge.num_days, 2);
    assert_eq!(challenge.scores, vec![1, 2, 3]);
    assert_eq!(
        challenge.libraries[0],
        Library {
            id: 0,
            books: vec![0, 1],
            signup_time: 1,
            ship_capacity: 1,
        }
    );
    assert_eq!(challenge.libraries[1].books, vec![2]);
    assert_eq!(challenge.libraries[1].signup_time, 0);
}

#[test]
fn test_to_input_reparses() {
    let challenge = scenario();
    assert_eq!(challenge.to_input(), SCENARIO);
}

#[test]
fn test_parse_errors_report_line() {
    let err = "3 2".parse::<Challenge>().unwrap_err();
    assert_eq!(
        err,
        ParseError::WrongTokenCount {
            line: 1,
            expected: 3,
            found: 2
        }
    );

    let err = "3 1 2\n1 x 3\n1 0 1\n0\n".parse::<Challenge>().unwrap_err();
    assert_eq!(
        err,
        ParseError::InvalidToken {
            line: 2,
            token: "x".to_string()
        }
    );

    let err = "3 2 2\n1 2 3\n2 1 1\n0 1\n".parse::<Challenge>().unwrap_err();
    assert_eq!(err, ParseError::MissingLine { line: 5 });

    let err = "3 1 2\n1 2 3\n2 1 1\n0 5\n".parse::<Challenge>().unwrap_err();
    assert_eq!(
        err,
        ParseError::BookOutOfRange {
            line: 4,
            book: 5,
            num_books: 3
        }
    );

    let err = "3 1 2\n1 2 3\n2 1 1\n1 1\n".parse::<Challenge>().unwrap_err();
    assert_eq!(err, ParseError::DuplicateBook { line: 4, book: 1 });
    assert_eq!(err.line(), 4);

    let err = "3 1 2\n1 2 3\n1 1 1\n1\n7 7\n".parse::<Challenge>().unwrap_err();
    assert_eq!(err, ParseError::TrailingInput { line: 5 });
}

#[test]
fn test_parse_huge_counts_fail_cleanly() {
    let err = "1 1000000000000000000 2\n5\n".parse::<Challenge>().unwrap_err();
    assert_eq!(err, ParseError::MissingLine { line: 3 });

    let err = "1 1000000000000000000 2\n5\n0 1 1\n".parse::<Challenge>().unwrap_err();
    assert_eq!(err, ParseError::MissingLine { line: 5 });

    let err = "1000000000000000000\n".parse::<Solution>().unwrap_err();
    assert_eq!(err, ParseError::MissingLine { line: 2 });
}

#[test]
fn test_parse_empty_library_at_end() {
    let challenge: Challenge = "2 1 5\n4 4\n0 1 1\n".parse().unwrap();
    assert!(challenge.libraries[0].books.is_empty());
}

#[test]
fn test_capacity_within() {
    let challenge = scenario();
    let library = &challenge.libraries[0];
    assert_eq!(library.capacity_within(2), 1);
    assert_eq!(library.capacity_within(1), 0);
    assert_eq!(library.capacity_within(0), 0);
    assert_eq!(library.shippable(10, 2), 2);
    assert_eq!(library.shippable(2, 2), 1);
    assert!(!library.can_sign_up(1));
}

#[test]
fn test_prefix_scores() {
    let challenge = scenario();
    assert_eq!(challenge.prefix_scores(&[2, 1, 0]), vec![0, 3, 5, 6]);
    assert_eq!(challenge.prefix_scores(&[]), vec![0]);
}

#[test]
fn test_scenario_optimal_solution() {
    let challenge = scenario();
    let mut solution = Solution::new();
    solution.push(1, vec![2]);
    solution.push(0, vec![1]);
    assert!(challenge.verify_solution(&solution).is_ok());
    assert_eq!(challenge.evaluate_solution(&solution).unwrap(), 5);
}

#[test]
fn test_total_score_counts_each_book_once() {
    let challenge: Challenge = "3 2 10\n5 7 11\n2 1 5\n0 1\n2 1 5\n1 2\n".parse().unwrap();
    let mut solution = Solution::new();
    solution.push(0, vec![0, 1]);
    solution.push(1, vec![1, 2]);
    assert_eq!(challenge.evaluate_total_score(&solution).unwrap(), 5 + 7 + 11);
    assert!(challenge.verify_solution(&solution).is_ok());
}

#[test]
fn test_verify_rejects_infeasible_solutions() {
    let challenge = scenario();

    let mut too_late = Solution::new();
    too_late.push(0, vec![1]);
    too_late.shipments.push(Shipment {
        library: 1,
        books: vec![2],
    });
    // 1 + 0 < 2, still feasible
    assert!(challenge.verify_solution(&too_late).is_ok());

    let mut too_many = Solution::new();
    too_many.push(0, vec![0, 1]);
    assert!(challenge.verify_solution(&too_many).is_err());

    let mut not_held = Solution::new();
    not_held.push(1, vec![0]);
    assert!(challenge.verify_solution(&not_held).is_err());

    let twice = Solution {
        shipments: vec![
            Shipment {
                library: 1,
                books: vec![2],
            },
            Shipment {
                library: 1,
                books: vec![],
            },
        ],
    };
    assert!(challenge.verify_solution(&twice).is_err());

    let mut unknown = Solution::new();
    unknown.push(9, vec![]);
    assert!(challenge.verify_solution(&unknown).is_err());

    let no_days: Challenge = "3 2 1\n1 2 3\n2 1 1\n0 1\n1 0 1\n2\n".parse().unwrap();
    let mut signup_past_budget = Solution::new();
    signup_past_budget.push(0, vec![]);
    assert!(no_days.verify_solution(&signup_past_budget).is_err());
}

#[test]
fn test_submission_format() {
    let mut solution = Solution::new();
    solution.push(1, vec![2]);
    solution.push(0, vec![1, 0]);
    let text = solution.to_submission();
    assert_eq!(text, "2\n1 1\n2\n0 2\n1 0\n");
    assert_eq!(Solution::from_submission(&text).unwrap(), solution);
    assert_eq!(Solution::new().to_submission(), "0\n");
}

#[test]
fn test_submission_with_empty_shipment() {
    let mut solution = Solution::new();
    solution.push(3, vec![]);
    let parsed: Solution = solution.to_submission().parse().unwrap();
    assert_eq!(parsed, solution);
}

#[test]
fn test_submission_parse_errors() {
    assert_eq!(
        Solution::from_submission("2\n1 1\n2\n").unwrap_err(),
        ParseError::MissingLine { line: 4 }
    );
    assert_eq!(
        Solution::from_submission("1\n1 2\n2\n").unwrap_err(),
        ParseError::WrongTokenCount {
            line: 3,
            expected: 2,
            found: 1
        }
    );
}

#[test]
fn test_track_from_str() {
    let track: Track = "books=100,libraries=10,days=30".parse().unwrap();
    assert_eq!(
        track,
        Track {
            books: 100,
            libraries: 10,
            days: 30
        }
    );
    assert_eq!(track.to_string(), "books=100,libraries=10,days=30");
    assert!("books=100,libraries=10".parse::<Track>().is_err());
    assert!("books=100,libraries=10,days=3,extra=1".parse::<Track>().is_err());
}

#[test]
fn test_generate_instance_is_deterministic() {
    let track = Track {
        books: 200,
        libraries: 20,
        days: 40,
    };
    let a = Challenge::generate_instance(&[7; 32], &track).unwrap();
    let b = Challenge::generate_instance(&[7; 32], &track).unwrap();
    let c = Challenge::generate_instance(&[8; 32], &track).unwrap();
    assert_eq!(a, b);
    assert_ne!(a, c);

    assert_eq!(a.num_libraries(), 20);
    assert_eq!(a.scores.len(), 200);
    for library in &a.libraries {
        assert!(!library.books.is_empty());
        assert!(library.books.iter().all(|&b| b < 200));
        assert!(library.signup_time >= 1);
        assert!(library.ship_capacity >= 1);
    }
    // Generated instances survive the text format unchanged
    assert_eq!(a.to_input().parse::<Challenge>().unwrap(), a);
}

#[test]
fn test_generate_instance_rejects_empty_track() {
    let track = Track {
        books: 0,
        libraries: 3,
        days: 10,
    };
    assert!(Challenge::generate_instance(&[0; 32], &track).is_err());
}

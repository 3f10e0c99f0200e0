use super::*;
use crate::error::ErrorKind;

fn close(a: f64, b: f64, tol: f64) -> bool {
    (a - b).abs() <= tol
}

fn row(values: &[f32]) -> Image<f32> {
    Image::from_vec(Dimensions::xy(values.len(), 1), values.to_vec()).unwrap()
}

#[test]
fn constant_image() {
    let img = Image::<u8>::from_vec(Dimensions::xy(16, 16), vec![100; 256]).unwrap();
    let mut stats = Statistics::new();
    let r = *stats.run(&img).unwrap();
    assert_eq!(r.minimum, 100.0);
    assert_eq!(r.maximum, 100.0);
    assert_eq!(r.mean, 100.0);
    assert_eq!(r.median, 100.0);
    assert_eq!(r.mode, 100.0);
    assert_eq!(r.variance, 0.0);
    assert_eq!(r.skewness, 0.0);
    assert_eq!(r.kurtosis, 0.0);
    assert_eq!(r.elements, 256);
    assert_eq!(r.mass, 25_600.0);
}

#[test]
fn moments_of_a_short_sequence() {
    let mut stats = Statistics::new();
    stats.run(&row(&[1.0, 2.0, 3.0, 4.0])).unwrap();
    assert_eq!(stats.get(Statistic::Mean), 2.5);
    assert!(close(stats.get(Statistic::Variance), 1.25, 1e-12));
    assert!(close(stats.get(Statistic::SDeviation), 1.25f64.sqrt(), 1e-12));
    assert_eq!(stats.get(Statistic::ADeviation), 1.0);
    assert_eq!(stats.get(Statistic::L1Norm), 10.0);
    assert!(close(stats.get(Statistic::L2Norm), 30f64.sqrt(), 1e-12));
    assert!(close(stats.get(Statistic::Skewness), 0.0, 1e-9));
    assert!(close(stats.get(Statistic::Median), 2.0, 1e-4));
    assert_eq!(stats.get(Statistic::Mode), 1.0);
}

#[test]
fn higher_moments_of_a_skewed_sequence() {
    let mut stats = Statistics::new();
    stats.run(&row(&[0.0, 0.0, 0.0, 1.0])).unwrap();
    assert!(close(stats.get(Statistic::Skewness), 2.0 / 3f64.sqrt(), 1e-9));
    assert!(close(stats.get(Statistic::Kurtosis), -2.0 / 3.0, 1e-9));
    assert_eq!(stats.get(Statistic::Mode), 0.0);
}

#[test]
fn integer_samples_round_median_and_mode() {
    let img = Image::<u8>::from_vec(Dimensions::xy(4, 1), vec![1, 2, 3, 4]).unwrap();
    let mut stats = Statistics::new();
    stats.run(&img).unwrap();
    assert_eq!(stats.get(Statistic::Median), 2.0);
    assert_eq!(stats.get(Statistic::Mode), 1.0);
}

#[test]
fn region_restricts_elements() {
    let img = Image::<f32>::from_fn(Dimensions::xy(6, 3), |c| c.x as f32);
    let region = Region::new(
        Coordinates { x: 2, ..Coordinates::default() },
        Coordinates { x: 4, y: 2, ..Coordinates::default() },
    );
    let mut stats = Statistics::new();
    let r = *stats.run_region(&img, region).unwrap();
    assert_eq!(r.elements, 9);
    assert_eq!(r.minimum, 2.0);
    assert_eq!(r.maximum, 4.0);
    assert_eq!(r.mean, 3.0);
}

#[test]
fn invalid_region_keeps_previous_result() {
    let img = row(&[5.0, 7.0]);
    let mut stats = Statistics::new();
    stats.run(&img).unwrap();
    let out_of_bounds = Region::new(
        Coordinates::default(),
        Coordinates { x: 2, ..Coordinates::default() },
    );
    let err = stats.run_region(&img, out_of_bounds).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidArgument);
    assert!(matches!(err, FeatureError::RegionOutOfBounds { axis: Axis::X, .. }));
    let inverted = Region::new(
        Coordinates { x: 1, ..Coordinates::default() },
        Coordinates::default(),
    );
    assert!(stats.run_region(&img, inverted).is_err());
    assert_eq!(stats.get(Statistic::Mean), 6.0);
}

#[test]
fn mask_broadcasts_over_unit_axes() {
    let img = Image::<f32>::from_fn(Dimensions::xy(4, 3), |c| (c.x + 10 * c.y) as f32);
    let mask = Image::<u8>::from_vec(Dimensions::xy(4, 1), vec![1, 0, 1, 0]).unwrap();
    let mut stats = Statistics::new();
    let r = *stats.run_masked(&img, None, &mask).unwrap();
    assert_eq!(r.elements, 6);
    assert_eq!(r.minimum, 0.0);
    assert_eq!(r.maximum, 22.0);
    assert_eq!(r.mass, (0 + 2 + 10 + 12 + 20 + 22) as f64);
}

#[test]
fn single_nonzero_mask_selects_everything() {
    let img = Image::<u16>::from_fn(Dimensions::xyz(5, 4, 3), |c| {
        (7 * c.x + 3 * c.y * c.y + 11 * c.z) as u16
    });
    let unit = Image::<u8>::from_vec(Dimensions::xy(1, 1), vec![1]).unwrap();
    let mut stats = Statistics::new();
    let plain = *stats.run(&img).unwrap();
    let masked = *stats.run_masked(&img, None, &unit).unwrap();
    assert_eq!(masked, plain);
    assert_eq!(masked.elements, 60);
}

#[test]
fn mask_follows_region_origin() {
    let img = Image::<f32>::from_fn(Dimensions::xy(5, 1), |c| c.x as f32);
    let mask = Image::<f32>::from_vec(Dimensions::xy(2, 1), vec![0.0, 1.0]).unwrap();
    let region = Region::new(
        Coordinates { x: 3, ..Coordinates::default() },
        Coordinates { x: 4, ..Coordinates::default() },
    );
    let mut stats = Statistics::new();
    stats.run_masked(&img, Some(region), &mask).unwrap();
    assert_eq!(stats.get(Statistic::Elements), 1.0);
    assert_eq!(stats.get(Statistic::Mean), 4.0);
}

#[test]
fn mask_extent_must_be_one_or_region_extent() {
    let img = Image::<f32>::new(Dimensions::xy(4, 3));
    let mask = Image::<u8>::new(Dimensions::xy(3, 1));
    let err = Statistics::new().run_masked(&img, None, &mask).unwrap_err();
    assert_eq!(
        err,
        FeatureError::MaskMismatch {
            axis: Axis::X,
            mask: 3,
            region: 4
        }
    );
}

#[test]
fn empty_selection_zeroes_everything() {
    let img = row(&[3.0, 4.0]);
    let mask = Image::<u8>::new(Dimensions::xy(2, 1));
    let mut stats = Statistics::new();
    stats.run(&img).unwrap();
    let r = *stats.run_masked(&img, None, &mask).unwrap();
    assert_eq!(r, StatisticsReport::default());
    for kind in Statistic::ALL {
        assert_eq!(stats.get(kind), 0.0, "{kind}");
    }
}

#[test]
fn empty_image_gives_zero_report() {
    let img = Image::<f32>::new(Dimensions::xyz(4, 0, 2));
    let mut stats = Statistics::new();
    stats.run(&row(&[3.0, 4.0])).unwrap();
    let r = *stats.run(&img).unwrap();
    assert_eq!(r, StatisticsReport::default());

    let unit = Image::<u8>::from_vec(Dimensions::xy(1, 1), vec![1]).unwrap();
    assert_eq!(*stats.run_masked(&img, None, &unit).unwrap(), StatisticsReport::default());

    // An explicit region cannot lie inside an empty extent.
    let err = stats.run_region(&img, Region::new(Coordinates::default(), Coordinates::default()));
    assert!(matches!(err, Err(FeatureError::RegionOutOfBounds { axis: Axis::Y, .. })));
}

#[test]
fn names_parse_case_insensitively() {
    let mut stats = Statistics::new();
    stats.run(&row(&[2.0, 4.0])).unwrap();
    assert_eq!(stats.get_named("Mean").unwrap(), 3.0);
    assert_eq!(stats.get_named("VARIANCE").unwrap(), 1.0);
    let err = stats.get_named("average").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::UnknownStatistic);
    for kind in Statistic::ALL {
        assert_eq!(kind.name().parse::<Statistic>().unwrap(), kind);
    }
}

#[test]
fn progress_reaches_completion() {
    let mut last = 0.0;
    let mut sink = |f: f64| last = f;
    Statistics::new()
        .run_with_progress::<f32, u8>(&row(&[1.0, 2.0]), None, None, &mut sink)
        .unwrap();
    assert_eq!(last, 1.0);
}

#[test]
fn report_serializes_every_aggregate() {
    let mut stats = Statistics::new();
    stats.run(&row(&[1.0])).unwrap();
    let json = serde_json::to_value(stats.report()).unwrap();
    let object = json.as_object().unwrap();
    assert_eq!(object.len(), Statistic::ALL.len());
    for kind in Statistic::ALL {
        assert!(object.contains_key(kind.name()), "{kind}");
    }
}

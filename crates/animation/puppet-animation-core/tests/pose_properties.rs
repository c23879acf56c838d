use puppet_animation_core::{
    pose_at, resolve_layer_transform, Character, Engine, Joint, JointPose, Keyframe, Layer,
    Motion, Pose, Snapshot, Transform,
};

fn approx(a: f32, b: f32, eps: f32) {
    assert!((a - b).abs() <= eps, "left={a} right={b} eps={eps}");
}

fn two_key_track(easing: &str) -> (Vec<Joint>, Vec<Keyframe>) {
    let joints = vec![Joint::new("J1", "shoulder", 0.0, 0.0)];
    let keyframes = vec![
        Keyframe::new("J1", 0, 0.0, 0.0),
        Keyframe::new("J1", 10, 100.0, 0.0).with_easing(easing),
    ];
    (joints, keyframes)
}

#[test]
fn linear_midpoint_scenario() {
    let (joints, kfs) = two_key_track("linear");
    let pose = pose_at(&joints, &kfs, 5);
    assert_eq!(pose.len(), 1);
    assert_eq!(pose.get("J1"), Some(&JointPose::new(50.0, 0.0, 0.0)));
}

#[test]
fn ease_in_out_passes_through_the_midpoint_but_ease_in_does_not() {
    let (joints, kfs) = two_key_track("easeInOut");
    approx(pose_at(&joints, &kfs, 5).get("J1").unwrap().x, 50.0, 1e-4);

    let (joints, kfs) = two_key_track("easeIn");
    approx(pose_at(&joints, &kfs, 5).get("J1").unwrap().x, 25.0, 1e-4);
}

#[test]
fn easing_belongs_to_the_arrival_keyframe() {
    let joints = vec![Joint::new("J1", "j", 0.0, 0.0)];
    // Departure says easeIn, arrival says linear: the segment is linear.
    let kfs = vec![
        Keyframe::new("J1", 0, 0.0, 0.0).with_easing("easeIn"),
        Keyframe::new("J1", 10, 100.0, 0.0),
    ];
    approx(pose_at(&joints, &kfs, 5).get("J1").unwrap().x, 50.0, 1e-4);
}

#[test]
fn unanimated_joints_rest_at_every_frame() {
    let joints = vec![
        Joint::new("still", "still", 7.0, -3.0),
        Joint::new("moving", "moving", 0.0, 0.0),
    ];
    let kfs = vec![Keyframe::new("moving", 2, 9.0, 9.0).with_rotation(45.0)];
    for frame in 0..40 {
        assert_eq!(pose_at(&joints, &kfs, frame).get("still"), Some(&JointPose::new(7.0, -3.0, 0.0)));
    }
}

#[test]
fn keyframes_are_hit_exactly() {
    let joints = vec![Joint::new("j", "j", 1.0, 1.0)];
    let kfs = vec![
        Keyframe::new("j", 3, 0.1, 0.7).with_rotation(12.5).with_easing("easeOutElastic"),
        Keyframe::new("j", 7, 33.3, -1.9).with_rotation(-80.0).with_easing("easeOutBounce"),
        Keyframe::new("j", 19, 0.3, 4.4).with_rotation(360.0).with_easing("easeInOutCubic"),
    ];
    for kf in &kfs {
        let p = pose_at(&joints, &kfs, kf.frame_number);
        assert_eq!(p.get("j"), Some(&JointPose::new(kf.x, kf.y, kf.rotation)));
    }
}

#[test]
fn linear_segments_are_affine_in_frame() {
    let joints = vec![Joint::new("j", "j", 0.0, 0.0)];
    let kfs = vec![
        Keyframe::new("j", 4, 10.0, -20.0).with_rotation(0.0),
        Keyframe::new("j", 12, 50.0, 20.0).with_rotation(80.0),
    ];
    let xs: Vec<JointPose> = (4..=12).map(|f| *pose_at(&joints, &kfs, f).get("j").unwrap()).collect();
    for w in xs.windows(2) {
        approx(w[1].x - w[0].x, 5.0, 1e-4);
        approx(w[1].y - w[0].y, 5.0, 1e-4);
        approx(w[1].rotation - w[0].rotation, 10.0, 1e-4);
    }
}

#[test]
fn evaluation_is_idempotent() {
    let (joints, kfs) = two_key_track("easeOutElastic");
    for frame in 0..12 {
        let a = pose_at(&joints, &kfs, frame);
        let b = pose_at(&joints, &kfs, frame);
        let bits = |p: &Pose| -> Vec<u32> {
            p.iter()
                .flat_map(|(_, j)| [j.x.to_bits(), j.y.to_bits(), j.rotation.to_bits()])
                .collect()
        };
        assert_eq!(bits(&a), bits(&b));
    }
}

#[test]
fn pre_and_post_roll_clamp() {
    let joints = vec![Joint::new("j", "j", 0.0, 0.0)];
    let kfs = vec![
        Keyframe::new("j", 5, 1.0, 2.0).with_rotation(3.0),
        Keyframe::new("j", 9, 4.0, 5.0).with_rotation(6.0).with_easing("easeOutElastic"),
    ];
    let first = pose_at(&joints, &kfs, 5);
    let last = pose_at(&joints, &kfs, 9);
    for f in 0..5 {
        assert_eq!(pose_at(&joints, &kfs, f), first);
    }
    for f in 10..30 {
        assert_eq!(pose_at(&joints, &kfs, f), last);
    }
}

#[test]
fn unbound_layers_keep_their_rest_transform() {
    let layer = Layer::new("L", "prop", 0).with_transform(Transform {
        x: 3.0,
        y: 4.0,
        rotation: 15.0,
        scale_x: 2.0,
        scale_y: 2.0,
    });
    let joints = vec![Joint::new("J1", "j", 0.0, 0.0)];
    for frame in [0, 5, 10] {
        let (_, kfs) = two_key_track("linear");
        let pose = pose_at(&joints, &kfs, frame);
        assert_eq!(resolve_layer_transform(&layer, &pose, &joints), layer.transform);
    }
}

#[test]
fn bound_layer_follows_joint_delta() {
    let (mut joints, kfs) = two_key_track("linear");
    joints[0] = joints[0].clone().with_layer("L");
    let layer = Layer::new("L", "arm", 0).with_transform(Transform::at(20.0, 0.0));
    let pose = pose_at(&joints, &kfs, 5);
    assert_eq!(
        resolve_layer_transform(&layer, &pose, &joints),
        Transform {
            x: 70.0,
            y: 0.0,
            rotation: 0.0,
            scale_x: 1.0,
            scale_y: 1.0
        }
    );
}

#[test]
fn dangling_keyframes_are_skipped_by_the_engine() {
    let mut character = Character::new("c");
    character.joints.push(Joint::new("J1", "j", 0.0, 0.0));
    let mut motion = Motion::new("m");
    motion.keyframes.push(Keyframe::new("deleted", 0, 99.0, 99.0));
    motion.keyframes.push(Keyframe::new("J1", 0, 1.0, 1.0));
    let engine = Engine::new(Snapshot::capture(&character, &motion));
    let pose = engine.pose_at(3);
    assert_eq!(pose.len(), 1);
    assert_eq!(pose.get("J1"), Some(&JointPose::new(1.0, 1.0, 0.0)));
}

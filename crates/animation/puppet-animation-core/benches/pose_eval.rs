use criterion::{black_box, criterion_group, criterion_main, Criterion};
use puppet_animation_core::{pose_at, Character, Engine, Joint, Keyframe, Layer, Motion, Snapshot};

fn rig(joints: usize, keys_per_joint: u32) -> (Character, Motion) {
    let mut c = Character::new("bench");
    let mut m = Motion::new("bench");
    m.frame_count = keys_per_joint * 4;
    for i in 0..joints {
        let id = format!("j{i}");
        let layer = format!("l{i}");
        c.layers.push(Layer::new(layer.as_str(), layer.as_str(), i as i32));
        let mut joint = Joint::new(id.as_str(), id.as_str(), i as f32, 0.0).with_layer(layer.as_str());
        if i > 0 {
            joint = joint.with_parent(format!("j{}", i - 1));
        }
        c.joints.push(joint);
        for k in 0..keys_per_joint {
            m.keyframes.push(
                Keyframe::new(id.as_str(), k * 4, k as f32, i as f32).with_easing("easeInOutCubic"),
            );
        }
    }
    (c, m)
}

fn bench_pose(c: &mut Criterion) {
    let (character, motion) = rig(64, 16);
    let engine = Engine::new(Snapshot::capture(&character, &motion));

    c.bench_function("pose_at_direct_64j", |b| {
        b.iter(|| pose_at(black_box(&character.joints), black_box(&motion.keyframes), black_box(30)))
    });
    c.bench_function("engine_frame_state_64j", |b| {
        b.iter(|| engine.frame_state(black_box(30)))
    });
}

criterion_group!(benches, bench_pose);
criterion_main!(benches);

//! FFmpeg argument lists for each pipeline stage.
//!
//! Every command starts with `-y` and ends with an explicit output path.

use super::spec::Canvas;
use std::path::Path;

fn path_arg(path: &Path) -> String {
    path.to_string_lossy().into_owned()
}

/// Expected length of a slideshow with `count` images.
pub fn slideshow_duration(count: usize, image_duration: f64, transition: f64) -> f64 {
    if count == 0 {
        return 0.0;
    }
    count as f64 * image_duration - (count.saturating_sub(1)) as f64 * transition
}

/// Offsets at which each crossfade starts.
pub fn xfade_offsets(count: usize, image_duration: f64, transition: f64) -> Vec<f64> {
    (1..count)
        .map(|k| k as f64 * (image_duration - transition))
        .collect()
}

/// Still images to a silent H.264 video, optionally crossfaded.
pub fn slideshow_args(
    images: &[impl AsRef<Path>],
    image_duration: f64,
    transition: f64,
    canvas: &Canvas,
    output: &Path,
) -> Vec<String> {
    let mut args = vec!["-y".to_string()];
    for image in images {
        args.extend([
            "-loop".to_string(),
            "1".to_string(),
            "-t".to_string(),
            format!("{}", image_duration),
            "-i".to_string(),
            path_arg(image.as_ref()),
        ]);
    }

    let mut filters = Vec::with_capacity(images.len() + 1);
    for i in 0..images.len() {
        filters.push(format!(
            "[{i}:v]scale={w}:{h}:force_original_aspect_ratio=decrease,\
             pad={w}:{h}:(ow-iw)/2:(oh-ih)/2,setsar=1,fps={fps},format=yuv420p[v{i}]",
            i = i,
            w = canvas.width,
            h = canvas.height,
            fps = canvas.fps
        ));
    }

    if images.len() == 1 {
        filters.push("[v0]null[out]".to_string());
    } else if transition > 0.0 {
        let offsets = xfade_offsets(images.len(), image_duration, transition);
        let mut previous = "v0".to_string();
        for (k, offset) in offsets.iter().enumerate() {
            let next = format!("v{}", k + 1);
            let label = if k + 2 == images.len() {
                "out".to_string()
            } else {
                format!("x{}", k + 1)
            };
            filters.push(format!(
                "[{}][{}]xfade=transition=fade:duration={}:offset={}[{}]",
                previous, next, transition, offset, label
            ));
            previous = label;
        }
    } else {
        let inputs = (0..images.len())
            .map(|i| format!("[v{}]", i))
            .collect::<String>();
        filters.push(format!("{}concat=n={}:v=1:a=0[out]", inputs, images.len()));
    }

    args.extend([
        "-filter_complex".to_string(),
        filters.join(";"),
        "-map".to_string(),
        "[out]".to_string(),
        "-c:v".to_string(),
        "libx264".to_string(),
        "-pix_fmt".to_string(),
        "yuv420p".to_string(),
        "-r".to_string(),
        canvas.fps.to_string(),
        path_arg(output),
    ]);
    args
}

/// Lay `audio` under `video`, looping the audio and trimming to the video.
pub fn mux_audio_args(video: &Path, audio: &Path, output: &Path) -> Vec<String> {
    vec![
        "-y".to_string(),
        "-i".to_string(),
        path_arg(video),
        "-stream_loop".to_string(),
        "-1".to_string(),
        "-i".to_string(),
        path_arg(audio),
        "-map".to_string(),
        "0:v:0".to_string(),
        "-map".to_string(),
        "1:a:0".to_string(),
        "-c:v".to_string(),
        "copy".to_string(),
        "-c:a".to_string(),
        "aac".to_string(),
        "-shortest".to_string(),
        path_arg(output),
    ]
}

/// WAV (or any audio) to MP3.
pub fn transcode_mp3_args(input: &Path, output: &Path) -> Vec<String> {
    vec![
        "-y".to_string(),
        "-i".to_string(),
        path_arg(input),
        "-codec:a".to_string(),
        "libmp3lame".to_string(),
        "-q:a".to_string(),
        "4".to_string(),
        path_arg(output),
    ]
}

/// Last `lines` lines of captured stderr, used as the job error message.
pub fn stderr_tail(stderr: &[u8], lines: usize) -> String {
    let text = String::from_utf8_lossy(stderr);
    let all = text.lines().collect::<Vec<_>>();
    let start = all.len().saturating_sub(lines);
    all[start..].join("\n")
}

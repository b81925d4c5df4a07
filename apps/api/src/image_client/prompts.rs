// Instruction text sent with every try-on generation.
// The person photo is always the first image, the garment the second.

/// Edit instruction for virtual try-on. Identity and scene must survive;
/// only the clothing changes.
pub const TRY_ON_INSTRUCTION: &str = "\
    Edit the FIRST image. Keep the same person: identity, face, skin tone, hair, \
    pose and background must not change. \
    Replace ONLY the clothing with the garment shown in the SECOND image. \
    The result must look like a real photo: natural fit and drape, consistent \
    shadows, lighting and perspective. Never alter the face.";
